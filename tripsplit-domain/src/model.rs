use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Net position per member, in member declaration order.
pub type MemberBalances = IndexMap<MemberId, Money, FxBuildHasher>;

/// Exact per-member amounts owed for a single expense.
pub type ExactShares = IndexMap<MemberId, Money, FxBuildHasher>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ExpenseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Decimal currency amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// Minimum settlement granularity (0.01). Balances and transfers at or
    /// below this magnitude are treated as settled.
    pub const EPSILON: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));
    /// Largest accepted gap between an exact split's share total and the
    /// expense amount (0.5).
    pub const SPLIT_TOLERANCE: Self = Self(Decimal::from_parts(5, 0, 0, false, 1));
    /// Decimal places of the minor currency unit.
    pub const MINOR_UNIT_SCALE: u32 = 2;
    /// Decimal places kept for equal-split shares; the division residue
    /// below this scale goes to the last share.
    pub const SPLIT_SCALE: u32 = 12;

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// `None` when the sum leaves the representable range.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Clamps at the largest representable magnitude instead of overflowing.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// True when the magnitude is below [`Money::EPSILON`].
    pub fn is_negligible(self) -> bool {
        self.abs() < Self::EPSILON
    }

    /// Splits the amount into `count` shares of `amount / count`.
    ///
    /// Shares are truncated to [`Money::SPLIT_SCALE`] decimal places and the
    /// last share absorbs the residue, so the shares always sum back to the
    /// original amount exactly. Returns an empty vector for `count == 0`.
    pub fn split_even(self, count: usize) -> Vec<Money> {
        if count == 0 {
            return Vec::new();
        }

        let divisor = Decimal::from(count as u64);
        let share =
            (self.0 / divisor).round_dp_with_strategy(Self::SPLIT_SCALE, RoundingStrategy::ToZero);
        let mut shares = vec![Self(share); count];
        let assigned = share * Decimal::from((count - 1) as u64);
        shares[count - 1] = Self(self.0 - assigned);
        shares
    }

    pub fn round_to_minor_units(self) -> Self {
        Self(self.0.round_dp_with_strategy(
            Self::MINOR_UNIT_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Food,
    Drink,
    CabTaxi,
    TrainBusFlight,
    HotelStay,
    EntryFee,
    Shopping,
    TrekkingGear,
    Alcohol,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Food,
        ExpenseCategory::Drink,
        ExpenseCategory::CabTaxi,
        ExpenseCategory::TrainBusFlight,
        ExpenseCategory::HotelStay,
        ExpenseCategory::EntryFee,
        ExpenseCategory::Shopping,
        ExpenseCategory::TrekkingGear,
        ExpenseCategory::Alcohol,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Drink => "Drink",
            ExpenseCategory::CabTaxi => "Cab/Taxi",
            ExpenseCategory::TrainBusFlight => "Train/Bus/Flight",
            ExpenseCategory::HotelStay => "Hotel/Stay",
            ExpenseCategory::EntryFee => "Entry Fee",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::TrekkingGear => "Trekking Gear",
            ExpenseCategory::Alcohol => "Alcohol",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown expense category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for ExpenseCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub is_creator: bool,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_creator: false,
        }
    }
}

/// How the cost of an expense is borne.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Amount divided evenly across the listed participants.
    Equal { participants: Vec<MemberId> },
    /// Each listed member owes exactly the given amount.
    Exact { shares: ExactShares },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub date: String,
    pub category: ExpenseCategory,
    pub payer: MemberId,
    pub split: Split,
    pub created_by: Option<MemberId>,
}

impl Expense {
    pub fn new(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<MemberId>,
        split: Split,
    ) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            amount,
            date: String::new(),
            category: ExpenseCategory::Other,
            payer: payer.into(),
            split,
            created_by: None,
        }
    }

    pub fn equal<I, M>(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<MemberId>,
        participants: I,
    ) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        let participants = participants.into_iter().map(Into::into).collect();
        Self::new(id, amount, payer, Split::Equal { participants })
    }

    pub fn exact<I, M>(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<MemberId>,
        shares: I,
    ) -> Self
    where
        I: IntoIterator<Item = (M, Money)>,
        M: Into<MemberId>,
    {
        let shares = shares
            .into_iter()
            .map(|(member, share)| (member.into(), share))
            .collect();
        Self::new(id, amount, payer, Split::Exact { shares })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_created_by(mut self, member: impl Into<MemberId>) -> Self {
        self.created_by = Some(member.into());
        self
    }
}

/// Point-in-time view of a trip handed to the settlement engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trip {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

impl Trip {
    pub fn new(members: Vec<Member>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> + '_ {
        self.members.iter().map(|member| &member.id)
    }
}

/// A single recommended payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub balances: MemberBalances,
    pub debts: Vec<Debt>,
}
