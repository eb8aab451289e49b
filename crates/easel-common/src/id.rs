use uuid::Uuid;

/// Correlation id for one host primitive or mutation subscription.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Eight hex digits tying together the log lines of one transfer flow.
pub fn new_correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
