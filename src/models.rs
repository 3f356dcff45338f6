// Request and response bodies

use serde::{Deserialize, Serialize};

// POST /chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
}

// POST /leads
#[derive(Debug, Clone, Deserialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadResponse {
    pub status: String,
    pub message: String,
}

impl LeadResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: "Lead recebido com sucesso!".to_string(),
        }
    }
}

// Error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}
