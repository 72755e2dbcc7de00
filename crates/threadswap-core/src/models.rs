// Rust guideline compliant 2026-10-19

//! Core data models for Threadswap.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of images attached to an item.
pub const MAX_IMAGES: usize = 5;
/// Maximum item title length in characters.
pub const MAX_TITLE_LEN: usize = 100;
/// Minimum item description length in characters.
pub const MIN_DESCRIPTION_LEN: usize = 10;
/// Maximum item description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Maximum garment type length in characters.
pub const MAX_TYPE_LEN: usize = 50;
/// Maximum color length in characters.
pub const MAX_COLOR_LEN: usize = 30;
/// Maximum brand length in characters.
pub const MAX_BRAND_LEN: usize = 50;
/// Maximum location length in characters.
pub const MAX_LOCATION_LEN: usize = 100;
/// Maximum length of a single tag in characters.
pub const MAX_TAG_LEN: usize = 30;
/// Maximum length of rejection reasons and swap messages.
pub const MAX_MESSAGE_LEN: usize = 500;

/// Garment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Shoes,
    Accessories,
    Dresses,
    Activewear,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
        Category::Dresses,
        Category::Activewear,
    ];

    /// Returns the wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::Dresses => "dresses",
            Category::Activewear => "activewear",
        }
    }
}

/// Garment size, either a letter size or a waist measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "XS")]
    Xs,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "28")]
    W28,
    #[serde(rename = "30")]
    W30,
    #[serde(rename = "32")]
    W32,
    #[serde(rename = "34")]
    W34,
    #[serde(rename = "36")]
    W36,
    #[serde(rename = "38")]
    W38,
    #[serde(rename = "40")]
    W40,
    #[serde(rename = "42")]
    W42,
}

impl Size {
    /// All sizes in display order.
    pub const ALL: [Size; 14] = [
        Size::Xs,
        Size::S,
        Size::M,
        Size::L,
        Size::Xl,
        Size::Xxl,
        Size::W28,
        Size::W30,
        Size::W32,
        Size::W34,
        Size::W36,
        Size::W38,
        Size::W40,
        Size::W42,
    ];

    /// Returns the wire name of the size.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Xs => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
            Size::W28 => "28",
            Size::W30 => "30",
            Size::W32 => "32",
            Size::W34 => "34",
            Size::W36 => "36",
            Size::W38 => "38",
            Size::W40 => "40",
            Size::W42 => "42",
        }
    }
}

/// Wear condition of a garment. Determines the item's point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Like new, no visible wear.
    Excellent,
    /// Minor signs of wear.
    Good,
    /// Noticeable wear, still good quality.
    Fair,
    /// Significant wear, functional.
    Worn,
}

impl Condition {
    /// All conditions from best to worst.
    pub const ALL: [Condition; 4] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::Worn,
    ];

    /// Returns the fixed point value for the condition.
    #[must_use]
    pub fn point_value(&self) -> i64 {
        match self {
            Condition::Excellent => 100,
            Condition::Good => 75,
            Condition::Fair => 50,
            Condition::Worn => 25,
        }
    }

    /// Returns the wire name of the condition.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Worn => "worn",
        }
    }
}

/// Status of an item in the listing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Submitted and waiting for moderation.
    PendingApproval,
    /// Approved and open for swaps or redemption.
    Available,
    /// Held by an accepted swap.
    Reserved,
    /// Exchanged or redeemed. Terminal.
    Swapped,
    /// Refused by a moderator. Terminal.
    Rejected,
}

impl ItemStatus {
    /// All item statuses.
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::PendingApproval,
        ItemStatus::Available,
        ItemStatus::Reserved,
        ItemStatus::Swapped,
        ItemStatus::Rejected,
    ];

    /// Returns the wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::PendingApproval => "pending_approval",
            ItemStatus::Available => "available",
            ItemStatus::Reserved => "reserved",
            ItemStatus::Swapped => "swapped",
            ItemStatus::Rejected => "rejected",
        }
    }
}

/// Status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    /// Waiting for the owner of the requested item.
    Pending,
    /// Accepted; both items are reserved.
    Accepted,
    /// Declined by the owner. Terminal.
    Rejected,
    /// Both items exchanged. Terminal.
    Completed,
    /// Withdrawn by the requester. Terminal.
    Cancelled,
}

impl SwapStatus {
    /// All swap statuses.
    pub const ALL: [SwapStatus; 5] = [
        SwapStatus::Pending,
        SwapStatus::Accepted,
        SwapStatus::Rejected,
        SwapStatus::Completed,
        SwapStatus::Cancelled,
    ];

    /// Returns the wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
        }
    }
}

/// Kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Credited when an owner's item is approved.
    Earned,
    /// Debited when a user redeems an item.
    Spent,
    /// Credited manually by an administrator.
    Bonus,
    /// Credit reversing an earlier debit.
    Refund,
}

impl TransactionKind {
    /// Returns the wire name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Earned => "earned",
            TransactionKind::Spent => "spent",
            TransactionKind::Bonus => "bonus",
            TransactionKind::Refund => "refund",
        }
    }

    /// Checks that `amount` carries the sign this kind requires.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative credit or a positive debit.
    pub fn check_amount(&self, amount: i64) -> Result<()> {
        let ok = match self {
            TransactionKind::Spent => amount <= 0,
            TransactionKind::Earned | TransactionKind::Bonus | TransactionKind::Refund => {
                amount >= 0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{} entry cannot carry amount {}",
                self.as_str(),
                amount
            )))
        }
    }
}

/// Platform role supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular member.
    #[default]
    User,
    /// Moderator with approval rights.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Authenticated caller of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User account id.
    pub user_id: String,
    /// Role asserted by the identity collaborator.
    pub role: Role,
}

impl Actor {
    /// Creates an actor with the `user` role.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::User,
        }
    }

    /// Creates an actor with the `admin` role.
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    /// Returns true if the actor holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A user account and its points balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique hash-based identifier (format: usr-XXXXXXXX).
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// Platform role.
    #[serde(default)]
    pub role: Role,
    /// Current points balance. Changed only through the ledger.
    #[serde(default)]
    pub points: i64,
    /// Manually granted starting balance with no ledger entry.
    #[serde(default)]
    pub opening_balance: i64,
    /// Whether the account may act.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

impl UserAccount {
    /// Validates the account data.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is malformed or a balance is negative.
    pub fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        if self.points < 0 {
            return Err(Error::InvalidArgument(format!(
                "Balance of {} cannot be negative",
                self.username
            )));
        }
        if self.opening_balance < 0 {
            return Err(Error::InvalidArgument(
                "Opening balance cannot be negative".to_string(),
            ));
        }
        crate::identity::validate_id_format(&self.id)
    }
}

/// Validates a username: 3-30 characters of ASCII letters, digits, `_` or `-`.
///
/// # Errors
///
/// Returns `InvalidArgument` if the username does not match.
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(Error::InvalidArgument(
            "Username must be 3-30 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidArgument(format!(
            "Username '{}' may only contain letters, digits, '_' and '-'",
            username
        )));
    }
    Ok(())
}

/// Caller-supplied fields of a new listing.
///
/// There is no point value here: it is derived from `condition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: Size,
    pub condition: Condition,
    pub color: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Owner-editable item fields. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProfileUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl ItemProfileUpdate {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.tags.is_none()
    }
}

/// A listed garment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique hash-based identifier (format: itm-XXXXXXXX).
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Free-text garment type such as "jeans" or "blazer".
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: Size,
    pub condition: Condition,
    pub color: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Opaque media references, in display order.
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Points credited on approval and charged on redemption.
    pub point_value: i64,
    /// Owning user id.
    pub owner: String,
    pub status: ItemStatus,
    /// Ids of users who favorited the item.
    #[serde(default)]
    pub favorites: BTreeSet<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub approved_at: Option<i64>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Item {
    /// Builds a `pending_approval` item from a draft.
    ///
    /// The point value comes from the draft's condition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any field is out of bounds.
    pub fn from_draft(
        id: String,
        owner: String,
        draft: ItemDraft,
        images: Vec<String>,
        now: i64,
    ) -> Result<Self> {
        let item = Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            item_type: draft.item_type.trim().to_string(),
            size: draft.size,
            point_value: draft.condition.point_value(),
            condition: draft.condition,
            color: draft.color.trim().to_string(),
            brand: trimmed_option(draft.brand),
            location: trimmed_option(draft.location),
            images,
            tags: normalize_tags(draft.tags),
            owner,
            status: ItemStatus::PendingApproval,
            favorites: BTreeSet::new(),
            views: 0,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        item.validate()?;
        Ok(item)
    }

    /// Validates the item data.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if:
    /// - A text field is empty or exceeds its limit
    /// - There are no images or more than five
    /// - The point value disagrees with the condition
    pub fn validate(&self) -> Result<()> {
        check_len("Title", &self.title, 1, MAX_TITLE_LEN)?;
        check_len(
            "Description",
            &self.description,
            MIN_DESCRIPTION_LEN,
            MAX_DESCRIPTION_LEN,
        )?;
        check_len("Type", &self.item_type, 1, MAX_TYPE_LEN)?;
        check_len("Color", &self.color, 1, MAX_COLOR_LEN)?;
        if let Some(brand) = &self.brand {
            check_len("Brand", brand, 0, MAX_BRAND_LEN)?;
        }
        if let Some(location) = &self.location {
            check_len("Location", location, 0, MAX_LOCATION_LEN)?;
        }
        for tag in &self.tags {
            check_len("Tag", tag, 1, MAX_TAG_LEN)?;
        }

        if self.images.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one image is required".to_string(),
            ));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(Error::InvalidArgument(format!(
                "At most {} images are allowed, got {}",
                MAX_IMAGES,
                self.images.len()
            )));
        }
        if self.images.iter().any(|image| image.trim().is_empty()) {
            return Err(Error::InvalidArgument(
                "Image reference cannot be empty".to_string(),
            ));
        }

        if self.point_value != self.condition.point_value() {
            return Err(Error::InvalidArgument(format!(
                "Point value {} does not match condition {}",
                self.point_value,
                self.condition.as_str()
            )));
        }

        if let Some(reason) = &self.rejection_reason {
            check_len("Rejection reason", reason, 1, MAX_MESSAGE_LEN)?;
        }

        crate::identity::validate_id_format(&self.id)
    }

    /// Applies an owner profile update.
    ///
    /// Status, condition and point value are not reachable from here.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the updated fields fail validation.
    pub fn apply_profile(&mut self, update: ItemProfileUpdate, now: i64) -> Result<()> {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = trimmed_option(Some(location));
        }
        if let Some(tags) = update.tags {
            self.tags = normalize_tags(tags);
        }
        self.updated_at = now;
        self.validate()
    }

    /// Toggles `user_id` in the favorites set and returns the new membership.
    pub fn toggle_favorite(&mut self, user_id: &str) -> bool {
        if self.favorites.remove(user_id) {
            false
        } else {
            self.favorites.insert(user_id.to_string());
            true
        }
    }

    /// Returns true if `user_id` favorited the item.
    #[must_use]
    pub fn is_favorited_by(&self, user_id: &str) -> bool {
        self.favorites.contains(user_id)
    }
}

/// An append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransaction {
    /// Unique hash-based identifier (format: txn-XXXXXXXX).
    pub id: String,
    /// User whose balance changed.
    pub user: String,
    /// Item the entry refers to, if any.
    #[serde(default)]
    pub item: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed change applied to the balance.
    pub amount: i64,
    pub description: String,
    /// Entry this one reverses, for refunds.
    #[serde(default)]
    pub related_transaction: Option<String>,
    pub created_at: i64,
}

impl PointTransaction {
    /// Validates the entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the amount has the wrong sign for its kind
    /// or the description is empty.
    pub fn validate(&self) -> Result<()> {
        self.kind.check_amount(self.amount)?;
        if self.description.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Transaction description cannot be empty".to_string(),
            ));
        }
        crate::identity::validate_id_format(&self.id)
    }
}

/// A proposal to exchange one item for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Unique hash-based identifier (format: swp-XXXXXXXX).
    pub id: String,
    /// User proposing the swap; owns `item_offered`.
    pub requester: String,
    pub item_offered: String,
    pub item_requested: String,
    pub status: SwapStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SwapRequest {
    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the items coincide or a message is too long.
    pub fn validate(&self) -> Result<()> {
        if self.item_offered == self.item_requested {
            return Err(Error::InvalidArgument(
                "An item cannot be swapped for itself".to_string(),
            ));
        }
        if let Some(message) = &self.message {
            check_len("Message", message, 0, MAX_MESSAGE_LEN)?;
        }
        if let Some(message) = &self.response_message {
            check_len("Response message", message, 0, MAX_MESSAGE_LEN)?;
        }
        crate::identity::validate_id_format(&self.id)
    }

    /// Returns true if `user_id` is the requester.
    #[must_use]
    pub fn is_requester(&self, user_id: &str) -> bool {
        self.requester == user_id
    }
}

/// Checks that `value` has between `min` and `max` characters.
///
/// # Errors
///
/// Returns `InvalidArgument` naming `field` when out of bounds.
pub fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        if min == 1 {
            return Err(Error::InvalidArgument(format!("{} cannot be empty", field)));
        }
        return Err(Error::InvalidArgument(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(Error::InvalidArgument(format!(
            "{} exceeds {} characters",
            field, max
        )));
    }
    Ok(())
}

fn trimmed_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

/// Returns the current Unix timestamp in seconds.
#[must_use]
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
