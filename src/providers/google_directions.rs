use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::directions_provider::{
    DirectionsProvider,
    DirectionsRequest,
    Route,
    RouteLeg,
    RouteStep,
};
use crate::error::{ AppError, Result };

const GOOGLE_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub struct GoogleDirectionsClient {
    client: reqwest::Client,
    api_key: String,
    region: String,
    base_url: String,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<GoogleRoute>,
}

#[derive(Deserialize)]
struct GoogleRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    overview_polyline: Option<Polyline>,
    legs: Vec<GoogleLeg>,
}

#[derive(Deserialize)]
struct Polyline {
    points: String,
}

#[derive(Deserialize)]
struct GoogleLeg {
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
    #[serde(default)]
    steps: Vec<GoogleStep>,
}

#[derive(Deserialize)]
struct GoogleStep {
    #[serde(default)]
    html_instructions: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Deserialize)]
struct ValueField {
    value: u64,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String, region: String) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build directions client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            region,
            base_url: GOOGLE_DIRECTIONS_URL.to_string(),
        })
    }

    fn build_url(&self, request: &DirectionsRequest) -> String {
        let mut avoid = Vec::new();
        if request.avoid_highways {
            avoid.push("highways");
        }
        if request.avoid_tolls {
            avoid.push("tolls");
        }
        if request.avoid_ferries {
            avoid.push("ferries");
        }

        let mut url = format!(
            "{}?origin={}&destination={}&mode=driving&alternatives=true&region={}&key={}",
            self.base_url,
            urlencoding::encode(&request.origin),
            urlencoding::encode(&request.destination),
            urlencoding::encode(&self.region.to_lowercase()),
            self.api_key
        );

        if !avoid.is_empty() {
            url.push_str("&avoid=");
            url.push_str(&urlencoding::encode(&avoid.join("|")));
        }

        url
    }
}

/// Drop markup from `html_instructions`, keeping a space where a block tag was.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
            }
            '>' if in_tag => {
                in_tag = false;
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl From<GoogleRoute> for Route {
    fn from(route: GoogleRoute) -> Self {
        Route {
            summary: route.summary,
            polyline: route.overview_polyline.map(|p| p.points),
            legs: route.legs
                .into_iter()
                .map(|leg| RouteLeg {
                    start_address: leg.start_address,
                    end_address: leg.end_address,
                    distance_m: leg.distance.map(|d| d.value).unwrap_or(0),
                    duration_s: leg.duration.map(|d| d.value).unwrap_or(0),
                    steps: leg.steps
                        .into_iter()
                        .map(|step| RouteStep {
                            instructions: strip_markup(&step.html_instructions),
                            distance_m: step.distance.map(|d| d.value).unwrap_or(0),
                            duration_s: step.duration.map(|d| d.value).unwrap_or(0),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    async fn directions(&self, request: &DirectionsRequest) -> Result<Vec<Route>> {
        let url = self.build_url(request);

        let response = self.client
            .get(&url)
            .send().await
            .map_err(|e| AppError::External(format!("Directions request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                AppError::External(format!("Directions API returned status: {}", response.status()))
            );
        }

        let body: DirectionsResponse = response
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse directions response: {}", e)))?;

        match body.status.as_str() {
            "OK" => Ok(body.routes.into_iter().map(Route::from).collect()),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(Vec::new()),
            "INVALID_REQUEST" =>
                Err(
                    AppError::InvalidInput(
                        body.error_message.unwrap_or_else(|| "Invalid directions request".to_string())
                    )
                ),
            other =>
                Err(
                    AppError::External(
                        format!(
                            "Directions API status {}: {}",
                            other,
                            body.error_message.unwrap_or_default()
                        )
                    )
                ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let html = "Turn <b>left</b> onto <b>N1</b><div style=\"font-size:0.9em\">Pass by Pretoria</div>";
        assert_eq!(strip_markup(html), "Turn left onto N1 Pass by Pretoria");
    }

    #[test]
    fn test_build_url_includes_avoid_flags() {
        let client = GoogleDirectionsClient::new("key".into(), "ZA".into()).unwrap();
        let url = client.build_url(
            &(DirectionsRequest {
                origin: "Cape Town".into(),
                destination: "Stellenbosch".into(),
                avoid_highways: true,
                avoid_tolls: false,
                avoid_ferries: true,
            })
        );

        assert!(url.contains("origin=Cape%20Town"));
        assert!(url.contains("alternatives=true"));
        assert!(url.contains("region=za"));
        assert!(url.contains("avoid=highways%7Cferries"));
    }

    #[test]
    fn test_google_route_conversion() {
        let raw = serde_json::json!({
            "summary": "N1",
            "overview_polyline": { "points": "abc" },
            "legs": [{
                "start_address": "A",
                "end_address": "B",
                "distance": { "value": 1200, "text": "1.2 km" },
                "duration": { "value": 300, "text": "5 mins" },
                "steps": [
                    { "html_instructions": "Head <b>north</b>", "distance": { "value": 200 }, "duration": { "value": 60 } },
                    { "html_instructions": "Turn right", "distance": { "value": 1000 }, "duration": { "value": 240 } }
                ]
            }]
        });

        let route: Route = serde_json::from_value::<GoogleRoute>(raw).unwrap().into();
        assert_eq!(route.distance_m(), 1200);
        assert_eq!(route.duration_s(), 300);
        assert_eq!(route.step_count(), 2);
        assert_eq!(route.legs[0].steps[0].instructions, "Head north");
        assert_eq!(route.polyline.as_deref(), Some("abc"));
    }
}
