//! Ghost-row exchange between ring-adjacent ranks.
//!
//! Runs once per tick on the coordinator thread, after the swap, on the
//! current buffer:
//!
//! 1. non-blocking send of the top owned row to `ring_prev` and of the
//!    bottom owned row to `ring_next`, both before any receive, so a ring
//!    of ranks all sending at once cannot circular-wait;
//! 2. blocking receive from `ring_prev` into the top ghost row;
//! 3. blocking receive from `ring_next` into the bottom ghost row.
//!
//! Exactly `width` values travel per message, in column order. This is
//! the only writer of ghost rows.

use halo_arena::WorldState;
use halo_comm::{Tag, Transport};
use halo_core::CommError;

/// Refresh both ghost rows of `world.current()`.
///
/// A single-rank ring is its own predecessor and successor; the exchange
/// then copies locally (bottom owned row into the top ghost, top owned row
/// into the bottom ghost) without touching the transport, which yields
/// the same torus as a real exchange would.
pub fn exchange_halo<T>(world: &WorldState, transport: &T) -> Result<(), CommError>
where
    T: Transport + ?Sized,
{
    let layout = world.layout();
    debug_assert_eq!(transport.rank(), layout.rank());
    let current = world.current();

    if layout.is_self_exchange() {
        current.copy_row(layout.bottom_row(), layout.top_ghost());
        current.copy_row(layout.top_row(), layout.bottom_ghost());
        return Ok(());
    }

    let prev = layout.ring_prev();
    let next = layout.ring_next();

    transport.isend(prev, Tag::Upward, current.raw_row(layout.top_row()))?;
    transport.isend(next, Tag::Downward, current.raw_row(layout.bottom_row()))?;

    let above = transport.recv(prev, Tag::Downward)?;
    current.write_raw_row(layout.top_ghost(), &above)?;

    let below = transport.recv(next, Tag::Upward)?;
    current.write_raw_row(layout.bottom_ghost(), &below)?;

    Ok(())
}
