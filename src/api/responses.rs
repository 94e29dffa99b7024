use serde::Serialize;

/// `GET` with `?id=` answers with one row, otherwise with a list.
#[derive(Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Serialize)]
pub struct Deleted<T> {
    pub message: String,
    pub deleted_records: Vec<T>,
}

impl<T> Deleted<T> {
    /// `noun` is the singular resource name, e.g. "audit log".
    pub fn new(noun: &str, deleted_records: Vec<T>) -> Self {
        Self {
            message: format!("Successfully deleted {} {}(s)", deleted_records.len(), noun),
            deleted_records,
        }
    }
}

#[derive(Serialize)]
pub struct Inserted<T> {
    pub message: String,
    pub data: Vec<T>,
}

#[derive(Serialize)]
pub struct Count {
    pub count: u64,
}
