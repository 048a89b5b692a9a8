use serde::{Deserialize, Serialize};

// -- Stylize --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Poetic,
    Witty,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Poetic => "poetic",
            Style::Witty => "witty",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylizeRequest {
    pub message: String,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeResponse {
    pub stylized_message: String,
}

// -- OCR --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub text: Option<String>,
}
