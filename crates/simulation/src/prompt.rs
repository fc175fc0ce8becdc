//! Prompt and post text.

use townsim_types::{Bot, Location};

const RESPONSE_LIMIT: &str = "Response must be at most 2000 characters.";
const ALERT_DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

/// Alert posted at the top of a location's channel.
pub fn alert_text(emergency: &str, location: &Location) -> String {
    format!(
        "🚨 **EMERGENCY ALERT** 🚨\n\n{}\n\n{}\n**Residents at {}:**",
        emergency, ALERT_DIVIDER, location.name
    )
}

/// Prompt for a bot's first reaction to the alert.
pub fn alert_prompt(emergency: &str, location: &Location) -> String {
    format!(
        "You are in {} when you receive this emergency alert:\n\n\"{}\"\n\n\
         Respond with your immediate reaction and thoughts about what to do. {}",
        location.name, emergency, RESPONSE_LIMIT
    )
}

/// Prompt for a bot's reply during a conversation round.
pub fn round_prompt(location: &Location, context: &str) -> String {
    format!(
        "You are at {} during an emergency. Here's the recent conversation:\n\n{}\n\n\
         Respond naturally to what others have said. Engage with their concerns and \
         continue the discussion. {} Don't give a preface like \"ok, here's my response\"; \
         respond directly as part of the conversation.",
        location.name, context, RESPONSE_LIMIT
    )
}

/// A bot's post: bold display name, then the text.
pub fn format_post(bot: &Bot, text: &str) -> String {
    format!("**{}**\n{}", bot.display_name(), text)
}

/// Channel name for a location, capped to `limit` characters.
pub fn channel_name(location: &Location, residents: usize, limit: usize) -> String {
    let name = if location.glyph.is_empty() {
        format!("{} ({} residents)", location.name, residents)
    } else {
        format!("{} {} ({} residents)", location.glyph, location.name, residents)
    };
    truncate_chars(&name, limit)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
