//! C struct layout computer.
//!
//! Given a [`StructType`] and an [`AbiProfile`], [`compute_layout`] returns
//! the size, alignment, and field offsets a C compiler for that target would
//! assign. The computation is a pure function over immutable inputs: it never
//! fails, never allocates shared state, and can run on any number of threads
//! at once.
//!
//! ```text
//! let test1 = StructType::new("test1", [
//!     ("a", TypeDesc::prim(PrimitiveKind::Int)),
//!     ("b", TypeDesc::prim(PrimitiveKind::Int)),
//!     ("c", TypeDesc::prim(PrimitiveKind::Double)),
//! ])?;
//! let layout = layout_for_target(&test1, "x86_64-unknown-linux-gnu")?;
//! assert_eq!((layout.size(), layout.alignment()), (16, 8));
//! assert_eq!(layout.offset_of("c"), Some(8));
//! ```
//!
//! # Views
//!
//! [`StructView`] and [`StructViewMut`] read and write fields of a struct
//! instance held in a byte buffer, using the computed offsets and the
//! target's byte order.
//!
//! # Tracing
//!
//! Layout computation emits `debug` spans per struct and `trace` events per
//! field. Call [`init_tracing`] and set `RUST_LOG=cabi_layout=trace` to see
//! them.

mod compute;
mod error;
mod layout;
mod stack;
mod view;

use std::sync::Once;

pub use cabi_abi::{AbiProfile, ByteOrder, EmptyStructRule, PrimitiveKind, TargetError};
pub use cabi_types::{StructBuilder, StructType, TypeDesc, TypeError};
pub use compute::{compute_layout, type_layout};
pub use error::LayoutError;
pub use layout::{FieldKind, FieldLayout, StructLayout, TypeLayout};
pub use view::{Scalar, StructView, StructViewMut};

/// Lay out `ty` for the target named by `triple`.
///
/// The only failure is an unknown or malformed triple.
pub fn layout_for_target(ty: &StructType, triple: &str) -> Result<StructLayout, LayoutError> {
    let profile = AbiProfile::for_target(triple)?;
    Ok(compute_layout(ty, profile))
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=cabi_layout=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // The embedding program may already own the global subscriber.
            if let Err(err) = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
            {
                tracing::debug!(%err, "keeping existing tracing subscriber");
            }
        }
    });
}
