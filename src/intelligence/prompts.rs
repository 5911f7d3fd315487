//! Prompt assembly for the completion provider.

use super::models::{ClientType, GenerationOptions, Mode, Tone};

const PACK_SCHEMA: &str = r#"{
  "listing": {
    "long": string,
    "short": string,
    "bullets": string[]
  },
  "social": {
    "instagram_caption": string,
    "facebook_post": string,
    "linkedin_post": string,
    "tiktok_hook": string,
    "tiktok_script": string
  },
  "emails": {
    "buyer_email": string,
    "seller_email": string
  },
  "talking_points": {
    "highlights": string[],
    "buyer_concerns": string[],
    "responses": string[]
  },
  "marketability": {
    "score_1_to_10": number,
    "summary": string,
    "improvement_suggestions": string[]
  },
  "open_house_pitch": string,
  "vision_features": {
    "interior_style": string,
    "notable_amenities": string[],
    "exterior_notes": string[],
    "potential_ideal_buyer": string
  }
}"#;

fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "Modern, clear and professional. No hype.",
        Tone::Casual => "Relaxed and conversational, like a note to a friend who is house hunting.",
        Tone::Luxury => "Refined and understated; emphasise craftsmanship, privacy and lifestyle.",
        Tone::Friendly => "Warm and welcoming, upbeat without exaggeration.",
    }
}

fn audience(client_type: ClientType) -> &'static str {
    match client_type {
        ClientType::Buyer => "prospective buyers",
        ClientType::Seller => "the seller and prospective listing clients",
        ClientType::General => "a general audience",
    }
}

pub fn system_prompt(options: &GenerationOptions) -> String {
    let task = match options.mode {
        Mode::Pack => format!(
            "You are Veris, an assistant that produces a complete property marketing and \
             intelligence pack for real estate professionals.\n\n\
             Return ONLY valid JSON with exactly this shape (no extra keys, no commentary):\n\n{}\n\n\
             The marketability score must be a number from 1 to 10.",
            PACK_SCHEMA
        ),
        Mode::SellerStudio => "You are Veris, an assistant for listing agents. Write a seller \
             studio brief in plain text: a pricing and positioning summary, the three strongest \
             selling points, preparation tasks before going live, and a short script the agent \
             can use in the listing presentation."
            .to_string(),
        Mode::BuyerStudio => "You are Veris, an assistant for buyer's agents. Write a buyer \
             studio brief in plain text: who the home suits, what to point out during a \
             showing, likely objections with honest answers, and a short follow-up message \
             the agent can send after the viewing."
            .to_string(),
    };

    format!(
        "{}\n\nWriting style:\n- {}\n- Written for {}.\n- Avoid emojis except where natural for \
         Instagram or TikTok.\n- Tailor everything to the specific property details provided; \
         never invent facts that are not in them.",
        task,
        tone_guidance(options.tone),
        audience(options.client_type)
    )
}

pub fn user_prompt(text: &str) -> String {
    format!("Property details from the agent:\n\n{}", text.trim())
}
