//! Capacity constants shared by the interpreter, the assembler and the codec.
//!
//! Every bounded container in the toolchain is sized against one of these
//! at compile time, and none of them ever grows past it.

/// Maximum number of live values on the operand stack.
pub const STACK_CAPACITY: usize = 1024;

/// Maximum number of instructions in a loaded program.
pub const PROGRAM_CAPACITY: usize = 1024;

/// Maximum number of labels the assembler's label table can hold.
pub const LABEL_CAPACITY: usize = 1024;

/// Maximum number of unresolved (forward-referenced) operands the
/// assembler can carry into its second pass.
pub const DEFERRED_CAPACITY: usize = 1024;

/// On-disk size, in bytes, of one instruction record: an 8-byte opcode
/// index followed by an 8-byte raw operand.
pub const RECORD_SIZE: usize = 16;
