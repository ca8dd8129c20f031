// Static lookup endpoints. These are placeholder datasets standing in for a
// real triage service / geo provider; the handlers exist so clients can
// integrate against the final API shape.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/symptoms", post(check_symptoms))
        .route("/home-remedies/{condition}", get(home_remedies))
        .route("/nearby-hospitals", get(nearby_hospitals))
        .route("/health-camps", get(health_camps))
}

fn conditions_for(symptom: &str) -> &'static [&'static str] {
    match symptom {
        "fever" => &["Flu", "Common Cold", "COVID-19"],
        "cough" => &["Common Cold", "Bronchitis"],
        _ => &[],
    }
}

fn possible_conditions(symptoms: &[String]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for symptom in symptoms {
        for &condition in conditions_for(symptom.trim().to_lowercase().as_str()) {
            if !out.contains(&condition) {
                out.push(condition);
            }
        }
    }
    out
}

fn remedies_for(condition: &str) -> Option<&'static [&'static str]> {
    match condition {
        "headache" => Some(&["Drink ginger tea", "Rest", "Use cold compress"]),
        "cough" => Some(&["Honey", "Steam inhalation"]),
        "fever" => Some(&["Hydration", "Paracetamol"]),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct SymptomsRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SymptomsResponse {
    pub possible_conditions: Vec<&'static str>,
    pub received: Vec<String>,
}

pub async fn check_symptoms(
    State(_state): State<AppState>,
    _auth: AuthContext,
    Json(req): Json<SymptomsRequest>,
) -> Result<Json<SymptomsResponse>, ApiError> {
    Ok(Json(SymptomsResponse {
        possible_conditions: possible_conditions(&req.symptoms),
        received: req.symptoms,
    }))
}

#[derive(Debug, Serialize)]
pub struct RemediesResponse {
    pub condition: String,
    pub remedies: Vec<&'static str>,
}

pub async fn home_remedies(
    State(_state): State<AppState>,
    _auth: AuthContext,
    Path(condition): Path<String>,
) -> Result<Json<RemediesResponse>, ApiError> {
    let remedies = remedies_for(condition.to_lowercase().as_str())
        .map(|r| r.to_vec())
        .unwrap_or_else(|| vec!["No remedies found"]);

    Ok(Json(RemediesResponse {
        condition,
        remedies,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct HospitalInfo {
    pub name: &'static str,
    pub distance_km: f64,
}

pub async fn nearby_hospitals(
    State(_state): State<AppState>,
    _auth: AuthContext,
    Query(q): Query<NearbyQuery>,
) -> Result<Json<Vec<HospitalInfo>>, ApiError> {
    tracing::debug!(lat = q.lat, lon = q.lon, "nearby hospital lookup");

    Ok(Json(vec![
        HospitalInfo {
            name: "AIIMS Hospital",
            distance_km: 2.5,
        },
        HospitalInfo {
            name: "City Clinic",
            distance_km: 4.2,
        },
    ]))
}

#[derive(Debug, Serialize)]
pub struct HealthCamp {
    pub title: &'static str,
    pub date: &'static str,
    pub location: &'static str,
}

// Public by design: camp listings are shown before login.
pub async fn health_camps() -> Json<Vec<HealthCamp>> {
    Json(vec![
        HealthCamp {
            title: "Free Eye Checkup",
            date: "2025-09-10",
            location: "Community Hall",
        },
        HealthCamp {
            title: "Blood Donation Drive",
            date: "2025-09-15",
            location: "City Hospital",
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_are_deduplicated() {
        let got = possible_conditions(&["fever".into(), "cough".into()]);
        assert_eq!(got, vec!["Flu", "Common Cold", "COVID-19", "Bronchitis"]);
    }

    #[test]
    fn symptom_lookup_is_case_insensitive() {
        assert_eq!(
            possible_conditions(&["  FEVER ".into()]),
            vec!["Flu", "Common Cold", "COVID-19"]
        );
    }

    #[test]
    fn unknown_symptom_yields_nothing() {
        assert!(possible_conditions(&["itchy elbow".into()]).is_empty());
    }

    #[test]
    fn unknown_condition_has_no_remedies() {
        assert!(remedies_for("unknown").is_none());
        assert_eq!(
            remedies_for("headache"),
            Some(&["Drink ginger tea", "Rest", "Use cold compress"][..])
        );
    }
}
