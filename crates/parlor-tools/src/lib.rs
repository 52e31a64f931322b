//! Tools and lookup tables shared by the parlor bots

pub mod arithmetic;
pub mod hotels;
pub mod orders;
pub mod search;
pub mod weather;

pub use arithmetic::{add_tool, multiply_tool, subtract_tool};
pub use hotels::{hotel_info_tool, hotel_instructions, select_hotel, Hotel, NO_HOTEL_INFO};
pub use orders::{get_order_status, order_status_tool, OrderStatus};
pub use search::WebSearchTool;
pub use weather::WeatherTool;
