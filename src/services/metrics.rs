use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

lazy_static! {
    pub static ref AUTHENTICATIONS_COUNTER: CounterVec = register_counter_vec!(
        "ridehail_authentications_total",
        "Authenticate calls by outcome",
        &["status"]
    ).unwrap();

    pub static ref TOKEN_CHECKS_COUNTER: CounterVec = register_counter_vec!(
        "ridehail_token_checks_total",
        "Token checks by outcome",
        &["status"]
    ).unwrap();

    pub static ref GATEWAY_ACTIONS_COUNTER: CounterVec = register_counter_vec!(
        "ridehail_gateway_actions_total",
        "Gateway submissions by action and outcome",
        &["action", "status"]
    ).unwrap();

    pub static ref CAR_REQUEST_UPDATES_COUNTER: CounterVec = register_counter_vec!(
        "ridehail_car_request_updates_total",
        "Car request updates by resulting lifecycle state",
        &["state"]
    ).unwrap();
}

/// Render every registered metric in the Prometheus text format.
pub fn render() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
