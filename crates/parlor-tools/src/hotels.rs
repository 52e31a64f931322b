//! Hotel records and the context-driven hotel assistant pieces
//!
//! The hotel is chosen from the user's text before the run starts and is
//! carried in the [`RunContext`]. Both the instructions and the info tool read
//! it from there, so one agent definition serves every hotel.

use parlor_agent::{Agent, AgentError, FunctionTool, RunContext};
use serde::Serialize;

/// Reply used when no hotel in the table matches
pub const NO_HOTEL_INFO: &str = "We don't have any information regarding this hotel.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hotel {
    pub name: &'static str,
    pub rooms: u32,
    pub price: u32,
    pub facilities: &'static [&'static str],
}

pub const HOTELS: &[Hotel] = &[
    Hotel {
        name: "marriott hotel",
        rooms: 120,
        price: 18000,
        facilities: &["Free WiFi", "Spa", "Restaurant"],
    },
    Hotel {
        name: "pearl continental",
        rooms: 100,
        price: 15000,
        facilities: &["Free WiFi", "Pool", "Gym"],
    },
    Hotel {
        name: "serena hotel",
        rooms: 80,
        price: 20000,
        facilities: &["Free WiFi", "Garden", "Conference Hall"],
    },
];

/// First hotel with a name token appearing anywhere in `text`
///
/// Matching is by substring on lowercased text, so "hotel" alone selects the
/// first hotel whose name contains that word.
pub fn select_hotel(text: &str) -> Option<&'static Hotel> {
    let text = text.to_lowercase();
    HOTELS.iter().find(|hotel| {
        hotel
            .name
            .to_lowercase()
            .split_whitespace()
            .any(|token| text.contains(token))
    })
}

pub fn hotel_summary(hotel: &Hotel) -> String {
    format!(
        "{} - Rooms: {}, Price: Rs {}, Facilities: {}",
        hotel.name,
        hotel.rooms,
        hotel.price,
        hotel.facilities.join(", ")
    )
}

/// Instructions naming the hotel held in the run context
pub fn hotel_instructions(ctx: &RunContext, _agent: &Agent) -> String {
    match ctx.context::<Hotel>() {
        Some(hotel) => format!(
            "You are a hotel booking assistant of {name}.\
             If the user asks about {name}, use the get_hotel_info tool. \
             If the user asks about a hotel that is not in your context, say: \
             '{NO_HOTEL_INFO}'",
            name = hotel.name
        ),
        None => format!("You are a hotel booking assistant. Always say: '{NO_HOTEL_INFO}'"),
    }
}

pub fn hotel_info_tool() -> FunctionTool {
    FunctionTool::new(
        "get_hotel_info",
        "Fetch hotel information",
        parlor_agent::tool::empty_object_schema(),
        |ctx, _args| {
            let hotel = ctx
                .context::<Hotel>()
                .ok_or_else(|| AgentError::tool("get_hotel_info", "no hotel selected"))?;
            tracing::info!(hotel = hotel.name, "Hotel info tool fired");
            Ok(hotel_summary(hotel))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_agent::Tool;

    #[test]
    fn test_select_by_name_token() {
        assert_eq!(select_hotel("Is the Pearl pool open?").unwrap().name, "pearl continental");
        assert_eq!(select_hotel("rooms at SERENA").unwrap().name, "serena hotel");
        assert_eq!(select_hotel("tell me about marriott").unwrap().name, "marriott hotel");
    }

    #[test]
    fn test_first_match_wins_on_shared_token() {
        // "hotel" is a token of both marriott and serena
        assert_eq!(select_hotel("any hotel near me?").unwrap().name, "marriott hotel");
    }

    #[test]
    fn test_no_match() {
        assert!(select_hotel("what about the hilton?").is_none());
        assert!(select_hotel("").is_none());
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            hotel_summary(&HOTELS[2]),
            "serena hotel - Rooms: 80, Price: Rs 20000, Facilities: Free WiFi, Garden, Conference Hall"
        );
    }

    #[test]
    fn test_instructions_follow_context() {
        let agent = Agent::new("Hotel Assistant");
        let ctx = RunContext::with_context(HOTELS[1]);
        let prompt = hotel_instructions(&ctx, &agent);
        assert!(prompt.starts_with("You are a hotel booking assistant of pearl continental."));
        assert!(prompt.contains("If the user asks about pearl continental, use the get_hotel_info tool."));
        assert!(prompt.ends_with("'We don't have any information regarding this hotel.'"));

        let prompt = hotel_instructions(&RunContext::new(), &agent);
        assert!(prompt.contains(NO_HOTEL_INFO));
    }

    #[tokio::test]
    async fn test_info_tool_reads_context() {
        let tool = hotel_info_tool();
        let ctx = RunContext::with_context(HOTELS[0]);
        assert_eq!(
            tool.invoke(&ctx, "").await.unwrap(),
            "marriott hotel - Rooms: 120, Price: Rs 18000, Facilities: Free WiFi, Spa, Restaurant"
        );

        let err = tool.invoke(&RunContext::new(), "{}").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolError { .. }));
    }
}
