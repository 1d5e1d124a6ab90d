//! Meal-plan agent.

use std::sync::Arc;

use crate::generator::Generator;
use crate::models::{JsonObject, NutritionRequest};
use crate::prompt::build_nutrition_prompt;

use super::{AgentError, run};

/// Produces a one-day, home-cooked meal plan.
#[derive(Clone)]
pub struct Nutritionist {
    generator: Arc<dyn Generator>,
}

impl Nutritionist {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn meal_plan(&self, request: &NutritionRequest) -> Result<JsonObject, AgentError> {
        run(self.generator.as_ref(), "meal_plan", &build_nutrition_prompt(request)).await
    }
}
