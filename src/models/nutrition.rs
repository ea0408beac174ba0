use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "meal_type")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal: Meal,
    pub food_items: Vec<String>,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNutritionLogRequest {
    pub date: String,
    pub meal: Meal,
    #[validate(length(min = 1, max = 50, message = "Provide between 1 and 50 food items"))]
    pub food_items: Vec<String>,
    #[validate(range(min = 0, max = 20000))]
    pub calories: i32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fat: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fiber: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[serde(alias = "food_text")]
    pub food_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Macronutrients {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

/// The JSON object the model is asked to embed in its answer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelNutritionAnalysis {
    #[serde(default)]
    pub food_items: Vec<String>,
    pub calories: f64,
    #[serde(default)]
    pub macronutrients: Macronutrients,
    #[serde(default)]
    pub health_impact: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Shape returned to the client under `analysis`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalysis {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
    pub food_items: Vec<String>,
    pub health_impact: String,
    pub recommendations: Vec<String>,
}

impl From<ModelNutritionAnalysis> for NutritionAnalysis {
    fn from(m: ModelNutritionAnalysis) -> Self {
        Self {
            calories: m.calories,
            protein: m.macronutrients.protein,
            carbohydrates: m.macronutrients.carbs,
            fats: m.macronutrients.fat,
            fiber: m.macronutrients.fiber,
            food_items: m.food_items,
            health_impact: m.health_impact,
            recommendations: m.recommendations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub success: bool,
    pub analysis: NutritionAnalysis,
}
