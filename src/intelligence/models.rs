use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::GenerationError;

/// Incoming generation payload. Everything is optional at the wire level so
/// that missing fields turn into a 400 rather than an extractor rejection.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(alias = "propertyText", alias = "propertyNotes")]
    pub text: Option<String>,
    pub mode: Option<String>,
    pub tone: Option<String>,
    pub client_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Full structured intelligence pack
    #[default]
    Pack,
    SellerStudio,
    BuyerStudio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Luxury,
    Friendly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientType {
    #[default]
    Buyer,
    Seller,
    General,
}

impl FromStr for Mode {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pack" | "listing" => Ok(Mode::Pack),
            "seller" => Ok(Mode::SellerStudio),
            "buyer" => Ok(Mode::BuyerStudio),
            other => Err(GenerationError::InvalidInput(format!(
                "Unsupported mode '{}'",
                other
            ))),
        }
    }
}

impl FromStr for Tone {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "luxury" => Ok(Tone::Luxury),
            "friendly" => Ok(Tone::Friendly),
            other => Err(GenerationError::InvalidInput(format!(
                "Unsupported tone '{}'",
                other
            ))),
        }
    }
}

impl FromStr for ClientType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(ClientType::Buyer),
            "seller" => Ok(ClientType::Seller),
            "general" => Ok(ClientType::General),
            other => Err(GenerationError::InvalidInput(format!(
                "Unsupported clientType '{}'",
                other
            ))),
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Luxury => "luxury",
            Tone::Friendly => "friendly",
        }
    }
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Buyer => "buyer",
            ClientType::Seller => "seller",
            ClientType::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    pub mode: Mode,
    pub tone: Tone,
    pub client_type: ClientType,
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, GenerationError>
where
    T: FromStr<Err = GenerationError> + Default,
{
    match value.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(v) => v.parse(),
    }
}

impl GenerationOptions {
    /// Absent or blank values fall back to the defaults; anything else must
    /// name a known variant.
    pub fn parse(
        mode: Option<&str>,
        tone: Option<&str>,
        client_type: Option<&str>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            mode: parse_or_default(mode)?,
            tone: parse_or_default(tone)?,
            client_type: parse_or_default(client_type)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Intelligence pack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCopy {
    pub long: String,
    pub short: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPosts {
    pub instagram_caption: String,
    pub facebook_post: String,
    pub linkedin_post: String,
    pub tiktok_hook: String,
    pub tiktok_script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emails {
    pub buyer_email: String,
    pub seller_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalkingPoints {
    pub highlights: Vec<String>,
    pub buyer_concerns: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marketability {
    pub score_1_to_10: f64,
    pub summary: String,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionFeatures {
    pub interior_style: String,
    pub notable_amenities: Vec<String>,
    pub exterior_notes: Vec<String>,
    pub potential_ideal_buyer: String,
}

/// Fixed-shape marketing pack. Every field is required when parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligencePack {
    pub listing: ListingCopy,
    pub social: SocialPosts,
    pub emails: Emails,
    pub talking_points: TalkingPoints,
    pub marketability: Marketability,
    pub open_house_pitch: String,
    pub vision_features: VisionFeatures,
}

/// Some OpenAI-compatible backends wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

impl IntelligencePack {
    pub fn from_completion(content: &str) -> Result<Self, GenerationError> {
        let pack: IntelligencePack = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        pack.validate()?;
        Ok(pack)
    }

    fn validate(&self) -> Result<(), GenerationError> {
        let score = self.marketability.score_1_to_10;
        if !score.is_finite() || !(1.0..=10.0).contains(&score) {
            return Err(GenerationError::MalformedResponse(format!(
                "marketability score {} outside 1-10",
                score
            )));
        }
        Ok(())
    }
}

/// What the generation endpoint returns: `{ "text": .. }` or the bare pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Text { text: String },
    Pack(Box<IntelligencePack>),
}
