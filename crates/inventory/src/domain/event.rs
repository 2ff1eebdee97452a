use crate::domain::response::withdrawal::WithdrawalHistoryResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Notification pushed to realtime subscribers after a committed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    ProductChanged {
        op: ChangeOp,
        product_id: i32,
    },
    WithdrawalCreated {
        withdrawal_id: i32,
        rows: Vec<WithdrawalHistoryResponse>,
    },
}

impl ChangeEvent {
    /// SSE event name the client listens on.
    pub fn channel(&self) -> &'static str {
        match self {
            ChangeEvent::ProductChanged { .. } => "products",
            ChangeEvent::WithdrawalCreated { .. } => "withdrawals",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_event_serializes_with_op() {
        let event = ChangeEvent::ProductChanged {
            op: ChangeOp::Update,
            product_id: 9,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(event.channel(), "products");
        assert_eq!(json["type"], "product_changed");
        assert_eq!(json["op"], "UPDATE");
        assert_eq!(json["product_id"], 9);
    }

    #[test]
    fn withdrawal_event_uses_withdrawals_channel() {
        let event = ChangeEvent::WithdrawalCreated {
            withdrawal_id: 1,
            rows: vec![],
        };
        assert_eq!(event.channel(), "withdrawals");
    }
}
