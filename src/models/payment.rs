use serde::{Deserialize, Serialize};

/// Payment form submitted as application/x-www-form-urlencoded.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "cardNumber")]
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub amount: f64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "courseId")]
    pub course_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    pub status: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}

impl PaymentResponse {
    pub fn succeeded(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}
