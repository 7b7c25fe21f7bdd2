//! Birdeye Endpoint Contracts
//!
//! One static contract per endpoint, plus the typed records a response is
//! narrowed into once it has passed its contract.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::datetime;
use super::schema::{self, Field, IssueKind, Schema, ValidationError};

/// Named response contract for one endpoint
#[derive(Debug, Clone, Copy)]
pub struct Contract {
    pub endpoint: &'static str,
    pub schema: Schema,
}

impl Contract {
    /// Check the value against the contract and narrow it into `T`
    pub fn parse<T: DeserializeOwned>(&self, value: Value) -> Result<T, ValidationError> {
        schema::validate(&value, &self.schema)?;
        serde_json::from_value(value).map_err(|e| ValidationError::single("", IssueKind::Coercion(e.to_string())))
    }
}

const PRICE_DATA: Schema = Schema::Object(&[
    Field::required("value", Schema::Number),
    Field::required("updateUnixTime", Schema::Number),
    Field::required("updateHumanTime", Schema::DateTime),
    Field::optional("liquidity", Schema::Number),
]);

const TOKEN_LIST_ITEM: Schema = Schema::Object(&[
    Field::required("address", Schema::String),
    Field::required("decimals", Schema::Number),
    Field::required("lastTradeUnixTime", Schema::Number),
    Field::optional("liquidity", Schema::Number),
    Field::required("logoURI", Schema::String),
    Field::required("mc", Schema::Number),
    Field::nullable("name", Schema::String),
    Field::nullable("symbol", Schema::String),
    Field::nullable("v24hChangePercent", Schema::Number),
    Field::required("v24hUSD", Schema::Number),
]);

const HISTORY_PRICE_ITEM: Schema = Schema::Object(&[
    Field::required("unixTime", Schema::Number),
    Field::required("value", Schema::Number),
]);

/// `/defi/networks`
pub static NETWORKS: Contract = Contract {
    endpoint: "networks",
    schema: Schema::Object(&[
        Field::required("success", Schema::Bool),
        Field::required("data", Schema::Array(&Schema::String)),
    ]),
};

/// `/defi/price`
pub static PRICE: Contract = Contract {
    endpoint: "price",
    schema: Schema::Object(&[
        Field::required("success", Schema::Bool),
        Field::required("data", PRICE_DATA),
    ]),
};

/// `/defi/tokenlist`
pub static TOKEN_LIST: Contract = Contract {
    endpoint: "tokenlist",
    schema: Schema::Object(&[
        Field::required("success", Schema::Bool),
        Field::optional("message", Schema::String),
        Field::required(
            "data",
            Schema::Object(&[
                Field::required("updateUnixTime", Schema::Number),
                Field::required("updateTime", Schema::DateTime),
                Field::required("total", Schema::Number),
                Field::required("tokens", Schema::Array(&TOKEN_LIST_ITEM)),
            ]),
        ),
    ]),
};

/// `/defi/history_price`
pub static HISTORY_PRICE: Contract = Contract {
    endpoint: "history_price",
    schema: Schema::Object(&[
        Field::required("success", Schema::Bool),
        Field::required(
            "data",
            Schema::Object(&[Field::required("items", Schema::Array(&HISTORY_PRICE_ITEM))]),
        ),
    ]),
};

/// `/defi/multi_price` (`data` may be absent)
pub static MULTI_PRICE: Contract = Contract {
    endpoint: "multi_price",
    schema: Schema::Object(&[
        Field::required("success", Schema::Bool),
        Field::optional("message", Schema::String),
        Field::optional("data", Schema::Array(&PRICE_DATA)),
    ]),
};

/// Common `{ success, message?, data? }` wrapper of every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Price snapshot of one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PriceData {
    pub value: f64,
    pub update_unix_time: f64,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub update_human_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
}

/// One page of the token list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenList {
    pub update_unix_time: f64,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub update_time: DateTime<Utc>,
    pub total: f64,
    pub tokens: Vec<TokenListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenListItem {
    pub address: String,
    pub decimals: f64,
    pub last_trade_unix_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    pub mc: f64,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub v24h_change_percent: Option<f64>,
    #[serde(rename = "v24hUSD")]
    pub v24h_usd: f64,
}

/// Price line of a token or pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryPrice {
    pub items: Vec<HistoryPriceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryPriceItem {
    pub unix_time: f64,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(name: Value, symbol: Value) -> Value {
        json!({
            "address": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
            "decimals": 5,
            "lastTradeUnixTime": 1700000000,
            "logoURI": "https://example.com/bonk.png",
            "mc": 1234567.5,
            "name": name,
            "symbol": symbol,
            "v24hChangePercent": null,
            "v24hUSD": 98765.4
        })
    }

    fn token_list_body(tokens: Vec<Value>) -> Value {
        json!({
            "success": true,
            "data": {
                "updateUnixTime": 1700000000,
                "updateTime": "2023-11-14T22:13:20",
                "total": tokens.len(),
                "tokens": tokens
            }
        })
    }

    #[test]
    fn test_price_rejects_extra_field() {
        let body = json!({
            "success": true,
            "data": {
                "value": 1,
                "updateUnixTime": 1700000000,
                "updateHumanTime": 1700000000,
                "extra": "x"
            }
        });
        let err = PRICE.parse::<Envelope<PriceData>>(body).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issue_at("data.extra"), Some(&IssueKind::Unexpected));
    }

    #[test]
    fn test_price_without_liquidity() {
        let body = json!({
            "success": true,
            "data": {"value": 150.2, "updateUnixTime": 1700000000, "updateHumanTime": 1700000000}
        });
        let envelope = PRICE.parse::<Envelope<PriceData>>(body).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.value, 150.2);
        assert_eq!(data.update_human_time.timestamp(), 1_700_000_000);
        assert!(data.liquidity.is_none());
    }

    #[test]
    fn test_price_rejects_message_field() {
        let body = json!({"success": false, "message": "Unauthorized"});
        let err = PRICE.parse::<Envelope<PriceData>>(body).unwrap_err();
        assert_eq!(err.issue_at("data"), Some(&IssueKind::Missing));
        assert_eq!(err.issue_at("message"), Some(&IssueKind::Unexpected));
    }

    #[test]
    fn test_token_list_accepts_null_name_and_symbol() {
        let body = token_list_body(vec![token(Value::Null, Value::Null)]);
        let envelope = TOKEN_LIST.parse::<Envelope<TokenList>>(body).unwrap();
        let list = envelope.data.unwrap();
        assert_eq!(list.tokens.len(), 1);
        assert!(list.tokens[0].name.is_none());
        assert!(list.tokens[0].symbol.is_none());
        assert!(list.tokens[0].v24h_change_percent.is_none());
        assert_eq!(list.update_time.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_token_list_rejects_absent_name() {
        let mut entry = token(json!("Bonk"), json!("BONK"));
        entry.as_object_mut().unwrap().remove("name");
        let err = TOKEN_LIST.parse::<Envelope<TokenList>>(token_list_body(vec![entry])).unwrap_err();
        assert_eq!(err.issue_at("data.tokens[0].name"), Some(&IssueKind::Missing));
    }

    #[test]
    fn test_token_list_rejects_null_liquidity() {
        let mut entry = token(json!("Bonk"), json!("BONK"));
        entry["liquidity"] = Value::Null;
        let err = TOKEN_LIST.parse::<Envelope<TokenList>>(token_list_body(vec![entry])).unwrap_err();
        assert_eq!(
            err.issue_at("data.tokens[0].liquidity"),
            Some(&IssueKind::WrongType { expected: "number", found: "null" })
        );
    }

    #[test]
    fn test_history_price_items() {
        let body = json!({
            "success": true,
            "data": {"items": [
                {"unixTime": 1700000000, "value": 55.1},
                {"unixTime": 1700000900, "value": 55.4}
            ]}
        });
        let history = HISTORY_PRICE.parse::<Envelope<HistoryPrice>>(body).unwrap().data.unwrap();
        assert_eq!(history.items.len(), 2);
        assert_eq!(history.items[1].unix_time, 1_700_000_900.0);
    }

    #[test]
    fn test_multi_price_failure_without_data_validates() {
        let body = json!({"success": false, "message": "rate limited"});
        let envelope = MULTI_PRICE.parse::<Envelope<Vec<PriceData>>>(body).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("rate limited"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_multi_price_rejects_null_data() {
        let body = json!({"success": true, "data": null});
        let err = MULTI_PRICE.parse::<Envelope<Vec<PriceData>>>(body).unwrap_err();
        assert_eq!(
            err.issue_at("data"),
            Some(&IssueKind::WrongType { expected: "array", found: "null" })
        );
    }

    #[test]
    fn test_networks_rejects_non_string_entry() {
        let body = json!({"success": true, "data": ["solana", 56]});
        let err = NETWORKS.parse::<Envelope<Vec<String>>>(body).unwrap_err();
        assert_eq!(
            err.issue_at("data[1]"),
            Some(&IssueKind::WrongType { expected: "string", found: "number" })
        );
    }

    #[test]
    fn test_datetime_serializes_back_to_same_second() {
        let body = json!({
            "success": true,
            "data": {"value": 1.0, "updateUnixTime": 1700000000, "updateHumanTime": "2023-11-14T22:13:20"}
        });
        let data = PRICE.parse::<Envelope<PriceData>>(body).unwrap().data.unwrap();
        let out = serde_json::to_value(&data).unwrap();
        assert_eq!(out["updateHumanTime"], json!("2023-11-14T22:13:20Z"));
        assert_eq!(data.update_human_time.timestamp() as f64, data.update_unix_time);
    }
}
