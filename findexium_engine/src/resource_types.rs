//! Trading reference data managed through the `/api/{bid|trade|curve|rating|rulename}` endpoints.
//!
//! Every field is optional on the wire. Each type states the handful of fields it actually needs in its
//! [`Resource::validate`] implementation, and that check runs before anything is written to the store.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use fdx_common::is_blank;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::FromRow;

/// Behaviour shared by all the CRUD resources.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Unpin + 'static {
    /// A human-readable label, used in log and error messages.
    const NAME: &'static str;

    /// Checks that the fields required for this resource are present.
    fn validate(&self) -> Result<(), String>;
}

/// Request body for updates. The `id` is optional, but if it is given it must match the id in the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePayload<R> {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub data: R,
}

//--------------------------------------        Bid        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Bid {
    pub account: Option<String>,
    pub bid_type: Option<String>,
    pub bid_quantity: Option<f64>,
    pub ask_quantity: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub benchmark: Option<String>,
    pub bid_list_date: Option<DateTime<Utc>>,
    pub commentary: Option<String>,
    pub bid_security: Option<String>,
    pub bid_status: Option<String>,
    pub trader: Option<String>,
    pub book: Option<String>,
    pub creation_name: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub revision_name: Option<String>,
    pub revision_date: Option<DateTime<Utc>>,
    pub deal_name: Option<String>,
    pub deal_type: Option<String>,
    pub source_list_id: Option<String>,
    pub side: Option<String>,
}

impl Resource for Bid {
    const NAME: &'static str = "Bid";

    fn validate(&self) -> Result<(), String> {
        if is_blank(self.account.as_deref()) {
            return Err("The account field is required.".into());
        }
        Ok(())
    }
}

//--------------------------------------       Trade       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Trade {
    pub account: Option<String>,
    pub trade_type: Option<String>,
    pub buy_quantity: Option<f64>,
    pub sell_quantity: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub trade_date: Option<DateTime<Utc>>,
    pub trade_security: Option<String>,
    pub trade_status: Option<String>,
    pub trader: Option<String>,
    pub benchmark: Option<String>,
    pub book: Option<String>,
    pub creation_name: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub revision_name: Option<String>,
    pub revision_date: Option<DateTime<Utc>>,
    pub deal_name: Option<String>,
    pub deal_type: Option<String>,
    pub source_list_id: Option<String>,
    pub side: Option<String>,
}

impl Resource for Trade {
    const NAME: &'static str = "Trade";

    fn validate(&self) -> Result<(), String> {
        if self.buy_quantity.is_none() && self.sell_quantity.is_none() {
            return Err("Either buy_quantity or sell_quantity must be provided.".into());
        }
        Ok(())
    }
}

//--------------------------------------     CurvePoint    ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CurvePoint {
    pub curve_id: Option<i64>,
    pub as_of_date: Option<DateTime<Utc>>,
    pub term: Option<f64>,
    pub curve_point_value: Option<f64>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl Resource for CurvePoint {
    const NAME: &'static str = "CurvePoint";

    fn validate(&self) -> Result<(), String> {
        match (self.term, self.curve_point_value) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err("Both term and curve_point_value are required.".into()),
        }
    }
}

//--------------------------------------       Rating      ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Rating {
    pub moodys_rating: Option<String>,
    pub sand_p_rating: Option<String>,
    pub fitch_rating: Option<String>,
    pub order_number: Option<i64>,
}

impl Resource for Rating {
    const NAME: &'static str = "Rating";

    fn validate(&self) -> Result<(), String> {
        let ratings = [self.moodys_rating.as_deref(), self.sand_p_rating.as_deref(), self.fitch_rating.as_deref()];
        if ratings.into_iter().all(is_blank) {
            return Err("At least one of moodys_rating, sand_p_rating or fitch_rating is required.".into());
        }
        Ok(())
    }
}

//--------------------------------------      RuleName     ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RuleName {
    pub name: Option<String>,
    pub description: Option<String>,
    pub json: Option<String>,
    pub template: Option<String>,
    pub sql_str: Option<String>,
    pub sql_part: Option<String>,
}

impl Resource for RuleName {
    const NAME: &'static str = "RuleName";

    fn validate(&self) -> Result<(), String> {
        if is_blank(self.name.as_deref()) {
            return Err("The name field is required.".into());
        }
        Ok(())
    }
}
