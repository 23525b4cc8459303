mod conditions_client;
mod response_structs;

pub use conditions_client::ConditionsClient;
pub use response_structs::ConditionsResponse;
