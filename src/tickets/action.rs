//! Typed button actions.
//!
//! Discord component interactions only carry a flat `custom_id` string, so
//! the action kind, channel and amount are encoded when the button is built
//! and parsed back exactly once, here, at the interaction boundary. The rest
//! of the code deals in this enum; no other module touches the wire strings.

use crate::core::ticket::TicketType;
use poise::serenity_prelude::ChannelId;

/// A staff control attached to a ticket's summary message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TicketAction {
    /// Close the ticket bound to the channel
    Close {
        /// Channel the ticket lives in
        channel_id: ChannelId,
    },
    /// Confirm the monetary ticket bound to the channel
    Confirm {
        /// `Deposit` or `Withdraw`
        ticket_type: TicketType,
        /// Channel the ticket lives in
        channel_id: ChannelId,
        /// Amount the button was built with; cross-checked against the
        /// persisted ticket before anything mutates
        amount: f64,
    },
}

impl TicketAction {
    /// Parses a component `custom_id`, returning `None` for ids that don't
    /// belong to this bot or fail to decode.
    #[must_use]
    pub fn parse(custom_id: &str) -> Option<Self> {
        if let Some(rest) = custom_id.strip_prefix("close_ticket_") {
            return Some(Self::Close {
                channel_id: parse_channel(rest)?,
            });
        }

        let (ticket_type, rest) = if let Some(rest) = custom_id.strip_prefix("confirm_deposit_") {
            (TicketType::Deposit, rest)
        } else if let Some(rest) = custom_id.strip_prefix("confirm_withdraw_") {
            (TicketType::Withdraw, rest)
        } else {
            return None;
        };

        let (channel, amount) = rest.split_once('_')?;
        let amount: f64 = amount.parse().ok()?;
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }

        Some(Self::Confirm {
            ticket_type,
            channel_id: parse_channel(channel)?,
            amount,
        })
    }

    /// Renders the `custom_id` this action is carried as.
    #[must_use]
    pub fn custom_id(&self) -> String {
        match self {
            Self::Close { channel_id } => format!("close_ticket_{channel_id}"),
            Self::Confirm {
                ticket_type,
                channel_id,
                amount,
            } => format!("confirm_{ticket_type}_{channel_id}_{amount}"),
        }
    }
}

fn parse_channel(value: &str) -> Option<ChannelId> {
    let raw: u64 = value.parse().ok()?;
    // ChannelId::new panics on zero
    if raw == 0 {
        return None;
    }
    Some(ChannelId::new(raw))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_close() {
        let action = TicketAction::parse("close_ticket_123456789012345678").unwrap();
        assert_eq!(
            action,
            TicketAction::Close {
                channel_id: ChannelId::new(123_456_789_012_345_678),
            }
        );
    }

    #[test]
    fn test_parse_confirm_deposit() {
        let action = TicketAction::parse("confirm_deposit_123456789012345678_250").unwrap();
        let TicketAction::Confirm {
            ticket_type,
            channel_id,
            amount,
        } = action
        else {
            panic!("expected a confirm action");
        };
        assert_eq!(ticket_type, TicketType::Deposit);
        assert_eq!(channel_id, ChannelId::new(123_456_789_012_345_678));
        assert_eq!(amount, 250.0);
    }

    #[test]
    fn test_parse_confirm_withdraw() {
        let action = TicketAction::parse("confirm_withdraw_42_75.5").unwrap();
        assert!(matches!(
            action,
            TicketAction::Confirm {
                ticket_type: TicketType::Withdraw,
                amount,
                ..
            } if amount == 75.5
        ));
    }

    #[test]
    fn test_round_trip() {
        let actions = [
            TicketAction::Close {
                channel_id: ChannelId::new(987_654_321_098_765_432),
            },
            TicketAction::Confirm {
                ticket_type: TicketType::Deposit,
                channel_id: ChannelId::new(42),
                amount: 100.0,
            },
            TicketAction::Confirm {
                ticket_type: TicketType::Withdraw,
                channel_id: ChannelId::new(42),
                amount: 60.5,
            },
        ];
        for action in actions {
            assert_eq!(TicketAction::parse(&action.custom_id()), Some(action));
        }
    }

    #[test]
    fn test_rejects_malformed_ids() {
        for bad in [
            "",
            "something_else",
            "close_ticket_",
            "close_ticket_abc",
            "close_ticket_0",
            "confirm_deposit_123",
            "confirm_deposit_123_",
            "confirm_deposit_abc_50",
            "confirm_deposit_123_-50",
            "confirm_deposit_123_NaN",
            "confirm_deposit_123_inf",
            "confirm_support_123_50",
        ] {
            assert_eq!(TicketAction::parse(bad), None, "accepted: {bad}");
        }
    }
}
