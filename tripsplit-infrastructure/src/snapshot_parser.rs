use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use tripsplit_domain::{
    Expense, ExpenseCategory, ExpenseId, Member, MemberId, Money, Split, Trip,
};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to parse trip snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trip document with the descriptive fields the engine does not use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripSnapshot {
    pub id: Option<String>,
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub creator_id: Option<MemberId>,
    pub trip: Trip,
}

impl TripSnapshot {
    /// Calendar days from `startDate` to `endDate`, both inclusive and at
    /// least 1. `None` when either date is missing or unreadable.
    pub fn duration_days(&self) -> Option<u32> {
        let start = parse_date(self.start_date.as_deref()?)?;
        let end = parse_date(self.end_date.as_deref()?)?;
        let days = (end - start).num_days().saturating_add(1).max(1);
        Some(u32::try_from(days).unwrap_or(u32::MAX))
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::debug!(value, error = %err, "Ignoring unreadable trip date");
            None
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripDocument {
    id: Option<String>,
    name: Option<String>,
    destination: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    creator_id: Option<String>,
    #[serde(default)]
    members: Vec<MemberDocument>,
    #[serde(default)]
    expenses: Vec<ExpenseDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberDocument {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_creator: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseDocument {
    id: String,
    #[serde(default)]
    description: String,
    amount: Decimal,
    #[serde(default)]
    date: String,
    category: Option<String>,
    payer_id: String,
    #[serde(default)]
    participant_ids: Vec<String>,
    split_type: Option<SplitType>,
    split_details: Option<IndexMap<String, Decimal>>,
    created_by: Option<String>,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
enum SplitType {
    Equal,
    Exact,
}

/// Reads trip snapshots in the app's camelCase JSON layout.
#[derive(Default)]
pub struct TripSnapshotParser;

impl TripSnapshotParser {
    pub fn parse(&self, content: &str) -> Result<TripSnapshot, SnapshotError> {
        let document: TripDocument = serde_json::from_str(content)?;
        Ok(to_snapshot(document))
    }

    pub fn parse_trip(&self, content: &str) -> Result<Trip, SnapshotError> {
        self.parse(content).map(|snapshot| snapshot.trip)
    }
}

fn to_snapshot(document: TripDocument) -> TripSnapshot {
    let TripDocument {
        id,
        name,
        destination,
        start_date,
        end_date,
        creator_id,
        members,
        expenses,
    } = document;

    let members = members
        .into_iter()
        .map(|member| Member {
            id: MemberId::from(member.id),
            name: member.name,
            is_creator: member.is_creator,
        })
        .collect();
    let expenses = expenses.into_iter().map(to_expense).collect();

    TripSnapshot {
        id,
        name,
        destination,
        start_date,
        end_date,
        creator_id: creator_id.map(MemberId::from),
        trip: Trip::new(members, expenses),
    }
}

fn to_expense(document: ExpenseDocument) -> Expense {
    let ExpenseDocument {
        id,
        description,
        amount,
        date,
        category,
        payer_id,
        participant_ids,
        split_type,
        split_details,
        created_by,
    } = document;

    let id = ExpenseId::from(id);
    let category = match category.as_deref().map(str::parse::<ExpenseCategory>) {
        None => ExpenseCategory::Other,
        Some(Ok(category)) => category,
        Some(Err(err)) => {
            tracing::warn!(expense_id = %id, error = %err, "Falling back to category Other");
            ExpenseCategory::Other
        }
    };

    // EXACT without details is treated as an equal split over participantIds.
    let split = match (split_type, split_details) {
        (Some(SplitType::Exact), Some(details)) => Split::Exact {
            shares: details
                .into_iter()
                .map(|(member, share)| (MemberId::from(member), Money::from_decimal(share)))
                .collect(),
        },
        (Some(SplitType::Exact), None) => {
            tracing::debug!(expense_id = %id, "Exact split without details; splitting equally");
            equal_split(participant_ids)
        }
        _ => equal_split(participant_ids),
    };

    Expense {
        id,
        description,
        amount: Money::from_decimal(amount),
        date,
        category,
        payer: MemberId::from(payer_id),
        split,
        created_by: created_by.map(MemberId::from),
    }
}

fn equal_split(participant_ids: Vec<String>) -> Split {
    Split::Equal {
        participants: participant_ids.into_iter().map(MemberId::from).collect(),
    }
}
