use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Car {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}
