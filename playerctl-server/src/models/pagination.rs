//! Pagination and sort order for player listings

use std::str::FromStr;

use super::ValidationError;

/// Default page size when `pageSize` is absent
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Validated page request (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 0
    pub number: u32,
    /// Items per page, at least 1
    pub size: u32,
}

impl PageRequest {
    /// Create a page request from raw query values.
    ///
    /// Unlike clamping, out-of-range values are rejected so a client asking
    /// for page -1 learns about it.
    pub fn new(number: Option<i64>, size: Option<i64>) -> Result<Self, ValidationError> {
        let number = number.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE as i64);

        let number = u32::try_from(number).map_err(|_| ValidationError::OutOfRange {
            field: "pageNumber",
            min: 0,
            max: u32::MAX as i64,
        })?;
        let size = u32::try_from(size)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or(ValidationError::OutOfRange {
                field: "pageSize",
                min: 1,
                max: u32::MAX as i64,
            })?;

        Ok(Self { number, size })
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        self.number as u64 * self.size as u64
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u32 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Field a listing is sorted by (ascending, ties broken by id)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl PlayerOrder {
    /// Column name in the `players` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Experience => "experience",
            Self::Birthday => "birthday",
            Self::Level => "level",
        }
    }
}

impl FromStr for PlayerOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(Self::Id),
            "NAME" => Ok(Self::Name),
            "EXPERIENCE" => Ok(Self::Experience),
            "BIRTHDAY" => Ok(Self::Birthday),
            "LEVEL" => Ok(Self::Level),
            other => Err(ValidationError::InvalidFormat {
                field: "order",
                reason: format!("unknown order '{}'", other),
            }),
        }
    }
}
