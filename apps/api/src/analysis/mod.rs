// Analysis: validates a persona/intervention request and runs extraction → prediction → report.

pub mod handlers;
pub mod pipeline;
