/// Tag of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
	/// Text present only in the first input.
	Delete,
	/// Text present only in the second input.
	Insert,
	/// Text present in both inputs.
	Equal,
	/// Cleanup-internal marker for an equality reclassified as a simultaneous
	/// delete + insert. Erased by `cleanup_merge`; never present in a final script.
	DeleteInsert,
}

impl Op {
	/// True for ops whose text belongs to the first input (source side).
	pub fn in_source(&self) -> bool {
		matches!(self, Op::Delete | Op::Equal)
	}

	/// True for ops whose text belongs to the second input (target side).
	pub fn in_target(&self) -> bool {
		matches!(self, Op::Insert | Op::Equal)
	}
}

/// One edit operation of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
	pub op: Op,
	pub text: String,
}

impl Diff {
	pub fn new(op: Op, text: impl Into<String>) -> Self {
		Self { op, text: text.into() }
	}

	pub fn equal(text: impl Into<String>) -> Self {
		Self::new(Op::Equal, text)
	}

	pub fn insert(text: impl Into<String>) -> Self {
		Self::new(Op::Insert, text)
	}

	pub fn delete(text: impl Into<String>) -> Self {
		Self::new(Op::Delete, text)
	}
}
