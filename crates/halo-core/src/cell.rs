//! The two-state cell alphabet.

use std::fmt;

/// State of a single automaton cell.
///
/// Stored as a single byte (`DEAD = 0`, `ALIVE = 1`) so that rows can be
/// shipped between ranks as plain integer arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// An empty cell.
    #[default]
    Dead = 0,
    /// An occupied cell.
    Alive = 1,
}

impl Cell {
    /// Raw wire value of this cell.
    #[inline]
    pub const fn to_raw(self) -> u8 {
        self as u8
    }

    /// Decode a raw wire value. Only `0` and `1` are valid.
    #[inline]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Dead),
            1 => Some(Self::Alive),
            _ => None,
        }
    }

    /// `true` for [`Cell::Alive`].
    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Cell selected by a uniform coin: `ALIVE` iff `coin >= 0.5`.
    #[inline]
    pub fn from_coin(coin: f64) -> Self {
        if coin >= 0.5 {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dead => f.write_str("."),
            Self::Alive => f.write_str("#"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_match_wire_encoding() {
        assert_eq!(Cell::Dead.to_raw(), 0);
        assert_eq!(Cell::Alive.to_raw(), 1);
        assert_eq!(Cell::from_raw(0), Some(Cell::Dead));
        assert_eq!(Cell::from_raw(1), Some(Cell::Alive));
        assert_eq!(Cell::from_raw(2), None);
    }

    #[test]
    fn coin_boundary_is_inclusive() {
        assert_eq!(Cell::from_coin(0.5), Cell::Alive);
        assert_eq!(Cell::from_coin(0.499_999), Cell::Dead);
        assert_eq!(Cell::from_coin(0.0), Cell::Dead);
        assert_eq!(Cell::from_coin(0.999), Cell::Alive);
    }
}
