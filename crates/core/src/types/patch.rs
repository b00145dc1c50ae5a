//! Fields of sparse updates.
//!
//! A [`PatchField`] has three states: absent (`None`, never sent), explicitly
//! cleared (`Some(None)`, sent as `null`) and set (`Some(Some(v))`).
//!
//! Serde cannot tell a missing key from `null` on a plain `Option`, so patch
//! fields pair `#[serde(default)]` with [`present`] (or [`present_lookup_id`]):
//! a missing key falls back to `None`, any value present in the input,
//! including `null`, is wrapped in `Some`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};

use super::coerce;

/// A field of a sparse update.
pub type PatchField<T> = Option<Option<T>>;

/// Deserialize a field that is present in the input.
///
/// Use with `#[serde(default, deserialize_with = "patch::present")]`.
///
/// # Errors
///
/// Fails if a non-null value does not deserialize as `T`.
pub fn present<'de, D, T>(deserializer: D) -> Result<PatchField<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// [`present`] for foreign keys, accepting every shape of
/// [`coerce::lookup_id`].
///
/// # Errors
///
/// Fails if a non-null value has none of the accepted shapes.
pub fn present_lookup_id<'de, D, T>(deserializer: D) -> Result<PatchField<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i32>,
{
    coerce::lookup_id_opt(deserializer).map(Some)
}

/// Serialize an amount field as a JSON number (or `null` when cleared).
///
/// Pair with `skip_serializing_if = "Option::is_none"`.
///
/// # Errors
///
/// Fails if the amount cannot be represented as a float.
#[allow(clippy::ref_option)]
pub fn amount<S>(value: &PatchField<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(inner) => rust_decimal::serde::float_option::serialize(inner, serializer),
        None => serializer.serialize_none(),
    }
}
