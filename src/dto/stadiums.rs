use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::models::Stadium;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStadiumRequest {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub image: Option<String>,
}

/// Partial update; absent fields keep their stored value. `description` and
/// `image` are cleared by an explicit `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStadiumRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub amenities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

// Present-but-null becomes `Some(None)`; `#[serde(default)]` covers absent.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StadiumList {
    #[schema(value_type = Vec<Stadium>)]
    pub items: Vec<Stadium>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clears_while_absent_keeps() {
        let cleared: UpdateStadiumRequest =
            serde_json::from_str(r#"{"description": null, "image": "pitch.png"}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.image, Some(Some("pitch.png".to_string())));

        let untouched: UpdateStadiumRequest = serde_json::from_str(r#"{"capacity": 12}"#).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.image, None);
        assert_eq!(untouched.capacity, Some(12));
    }
}
