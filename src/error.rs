use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[display("{_0}")]
	#[from(String, &String, &str)]
	Custom(String),

	// -- Delta decode
	#[display("Unknown delta op '{op}' (expected '=', '-' or '+')")]
	DeltaInvalidOp { op: char },
	#[display("Invalid count in delta token '{token}'")]
	DeltaBadCount { token: String },
	#[display("Invalid percent escape in delta token '{token}'")]
	DeltaBadEscape { token: String },
	#[display("Delta walks past the end of the source text ({wanted} code points wanted, {available} available)")]
	DeltaSourceOverrun { wanted: usize, available: usize },
	#[display("Delta covers {consumed} code points of a {total} code point source text")]
	DeltaSourceUnderrun { consumed: usize, total: usize },
}

// region:    --- Custom

impl Error {
	pub fn delta_invalid_op(op: char) -> Self {
		Self::DeltaInvalidOp { op }
	}

	pub fn delta_bad_count(token: impl Into<String>) -> Self {
		Self::DeltaBadCount { token: token.into() }
	}

	pub fn delta_bad_escape(token: impl Into<String>) -> Self {
		Self::DeltaBadEscape { token: token.into() }
	}

	pub fn delta_source_overrun(wanted: usize, available: usize) -> Self {
		Self::DeltaSourceOverrun { wanted, available }
	}

	pub fn delta_source_underrun(consumed: usize, total: usize) -> Self {
		Self::DeltaSourceUnderrun { consumed, total }
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
