//! Prompt construction for the assistant and nutrition analysis, and parsing
//! of the structured part of model answers.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::models::chat::ChatMessage;
use crate::models::medical::MedicalCondition;
use crate::models::nutrition::{ModelNutritionAnalysis, NutritionAnalysis, NutritionLog};
use crate::models::tracking::{CalorieEntry, SleepEntry, WeightEntry};
use crate::models::user::User;

pub const RECENT_LOG_LIMIT: usize = 5;
pub const HISTORY_LIMIT: usize = 10;

/// The user's recent data as fetched for the assistant. Each list is
/// most-recent-first, as the queries return it.
#[derive(Debug, Default)]
pub struct AssistantLogs {
    pub calories: Vec<CalorieEntry>,
    pub sleep: Vec<SleepEntry>,
    pub weight: Vec<WeightEntry>,
    pub nutrition: Vec<NutritionLog>,
    pub medical: Vec<MedicalCondition>,
}

fn profile_section(profile: Option<&User>) -> String {
    let Some(p) = profile else {
        return "User profile: not provided.\n".into();
    };

    let mut out = String::from("User profile:\n");
    let fields: [(&str, Option<String>); 7] = [
        ("Gender", p.gender.clone()),
        ("Date of birth", p.dob.map(|d| d.to_string())),
        ("Height (cm)", p.height_cm.map(|v| v.to_string())),
        ("Weight (kg)", p.weight_kg.map(|v| v.to_string())),
        ("Target weight (kg)", p.target_weight_kg.map(|v| v.to_string())),
        ("Activity level", p.activity_level.clone()),
        ("Usual sleep (hours)", p.sleep_hours.map(|v| v.to_string())),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "- {label}: {value}");
        }
    }
    out
}

fn logs_section(logs: &AssistantLogs) -> String {
    let mut out = String::new();

    out.push_str("Recent calorie logs:\n");
    for c in logs.calories.iter().take(RECENT_LOG_LIMIT) {
        let _ = writeln!(
            out,
            "- {}: consumed {} kcal, burned {} kcal, net {} kcal",
            c.date, c.calories_consumed, c.calories_burned, c.net_calories
        );
    }

    out.push_str("Recent sleep logs:\n");
    for s in logs.sleep.iter().take(RECENT_LOG_LIMIT) {
        let _ = writeln!(out, "- {}: {} hours ({:?})", s.date, s.duration_hours, s.quality);
    }

    out.push_str("Recent weight logs:\n");
    for w in logs.weight.iter().take(RECENT_LOG_LIMIT) {
        let _ = writeln!(out, "- {}: {} kg", w.date, w.weight);
    }

    out.push_str("Recent nutrition logs:\n");
    for n in logs.nutrition.iter().take(RECENT_LOG_LIMIT) {
        let _ = writeln!(
            out,
            "- {} {:?}: {} ({} kcal, protein {}g, carbs {}g, fat {}g, fiber {}g)",
            n.date,
            n.meal,
            n.food_items.join(", "),
            n.calories,
            n.protein,
            n.carbs,
            n.fat,
            n.fiber
        );
    }

    out.push_str("Medical history:\n");
    if logs.medical.is_empty() {
        out.push_str("- none recorded\n");
    }
    for m in &logs.medical {
        let _ = write!(out, "- {} (diagnosed {})", m.condition, m.diagnosis_date);
        if let Some(t) = &m.treatment {
            let _ = write!(out, "; treatment: {t}");
        }
        if let Some(meds) = &m.medications {
            let _ = write!(out, "; medications: {meds}");
        }
        out.push('\n');
    }

    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn history_line(m: &ChatMessage) -> String {
    format!("{}: {}\n", m.sender.label(), m.text)
}

/// Builds the single text prompt sent to the model.
///
/// `history` is oldest-first; only its last [`HISTORY_LIMIT`] messages are
/// used. If the result would exceed `max_chars` characters (not bytes), the
/// oldest of those messages are dropped until it fits. Profile, logs and the query are always kept.
pub fn build_prompt(
    profile: Option<&User>,
    logs: &AssistantLogs,
    history: &[ChatMessage],
    query: &str,
    max_chars: usize,
) -> String {
    let header = "You are a personal health and fitness assistant. Use the user's data below \
                  to answer their question.\n\n";
    let fixed_before = format!(
        "{header}{}\n{}\nConversation so far:\n",
        profile_section(profile),
        logs_section(logs)
    );
    let fixed_after = format!(
        "\nNow respond to the query:\n{query}\n\nPlease keep the answer precise and concise; \
         medium-length answers in bullet points are preferred."
    );

    let recent = &history[history.len().saturating_sub(HISTORY_LIMIT)..];
    let mut lines: Vec<String> = recent.iter().map(history_line).collect();

    let budget = max_chars.saturating_sub(char_len(&fixed_before) + char_len(&fixed_after));
    let mut used: usize = lines.iter().map(|l| char_len(l)).sum();
    let mut dropped = 0;
    while used > budget && dropped < lines.len() {
        used -= char_len(&lines[dropped]);
        dropped += 1;
    }
    lines.drain(..dropped);

    let mut prompt = fixed_before;
    if lines.is_empty() {
        prompt.push_str("(no previous messages)\n");
    }
    for line in lines {
        prompt.push_str(&line);
    }
    prompt.push_str(&fixed_after);
    prompt
}

pub fn nutrition_prompt(food_text: &str) -> String {
    format!(
        r#"Analyze the nutritional content of the following food items and provide a JSON response:

Food items: "{food_text}"

Please provide the following information in JSON format:
{{
  "food_items": [array of identified food items],
  "calories": number,
  "macronutrients": {{
    "protein": grams,
    "carbs": grams,
    "fat": grams,
    "fiber": grams
  }},
  "health_impact": string summary,
  "recommendations": [array of health tips]
}}"#
    )
}

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

/// Returns the span from the first `{` to the last `}` in `text`.
pub fn extract_json_block(text: &str) -> AppResult<&str> {
    json_block_re()
        .find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| AppError::UpstreamFormat("no JSON object in model response".into()))
}

pub fn parse_nutrition_response(text: &str) -> AppResult<NutritionAnalysis> {
    let block = extract_json_block(text)?;
    let parsed: ModelNutritionAnalysis = serde_json::from_str(block)
        .map_err(|e| AppError::UpstreamFormat(format!("invalid nutrition JSON: {e}")))?;
    Ok(parsed.into())
}
