//! A small stack-based virtual machine: tagged words, a two-pass
//! assembler's target representation, an interpreter, and the pieces
//! (opcode table, trap kinds) the satellite crates build on.

pub mod constants;
pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod nan;
pub mod opcode;
pub mod program;
pub mod word;

pub use error::TrapKind;
pub use instruction::Instruction;
pub use interpreter::{Interpreter, State};
pub use opcode::Opcode;
pub use program::{Program, ProgramTooLarge};
pub use word::Word;

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_program(instructions: Vec<Instruction>, limit: i64) -> Interpreter {
        let program = Program::new(instructions).unwrap();
        let mut vm = Interpreter::new(program);
        vm.run(limit);
        vm
    }

    #[test]
    fn fibonacci_prefix() {
        // push 0; push 1; rdup 1; rdup 1; addi; jmp 2
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_u64(0)),
            Instruction::new(Opcode::PUSH, Word::from_u64(1)),
            Instruction::new(Opcode::DUP_REL, Word::from_i64(1)),
            Instruction::new(Opcode::DUP_REL, Word::from_i64(1)),
            Instruction::new(Opcode::ADDI, Word::default()),
            Instruction::new(Opcode::JMP, Word::from_u64(2)),
        ];
        let vm = run_program(instructions, 20);
        assert_eq!(vm.state(), State::Running);
        assert!(matches!(vm.ip(), 2..=5));
        let stack: Vec<u64> = vm.stack().iter().map(|w| w.u64()).collect();
        assert_eq!(&stack[..2], &[0, 1]);
        for w in stack.windows(3) {
            assert_eq!(w[2], w[0] + w[1]);
        }
    }

    #[test]
    fn division_by_zero_leaves_stack_untouched_and_traps() {
        // push 10; push 0; divi; halt
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_u64(10)),
            Instruction::new(Opcode::PUSH, Word::from_u64(0)),
            Instruction::bare(Opcode::DIVI),
            Instruction::bare(Opcode::HALT),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::DivByZero));
        let stack: Vec<u64> = vm.stack().iter().map(|w| w.u64()).collect();
        assert_eq!(stack, vec![10, 0]);
    }

    #[test]
    fn float_addition() {
        // push 1.5; push 2.25; addf; halt
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_f64(1.5)),
            Instruction::new(Opcode::PUSH, Word::from_f64(2.25)),
            Instruction::bare(Opcode::ADDF),
            Instruction::bare(Opcode::HALT),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Halted);
        assert_eq!(vm.stack().last().unwrap().f64(), 3.75);
    }

    #[test]
    fn step_budget_stops_short_and_resumes() {
        // nop; nop; nop; halt
        let instructions = vec![
            Instruction::bare(Opcode::NOP),
            Instruction::bare(Opcode::NOP),
            Instruction::bare(Opcode::NOP),
            Instruction::bare(Opcode::HALT),
        ];
        let program = Program::new(instructions).unwrap();
        let mut vm = Interpreter::new(program);
        assert_eq!(vm.run(2), State::Running);
        assert_eq!(vm.ip(), 2);
        assert!(!vm.is_halted());
        assert_eq!(vm.run(-1), State::Halted);
    }

    #[test]
    fn push_at_capacity_boundary_then_overflows() {
        let mut instructions: Vec<Instruction> = (0..constants::STACK_CAPACITY)
            .map(|_| Instruction::new(Opcode::PUSH, Word::from_u64(1)))
            .collect();
        instructions.push(Instruction::new(Opcode::PUSH, Word::from_u64(1)));
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::StackOverflow));
    }

    #[test]
    fn addi_on_empty_stack_underflows() {
        let instructions = vec![Instruction::bare(Opcode::ADDI)];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::StackUnderflow));
    }

    #[test]
    fn not_on_empty_stack_underflows_not_overflows() {
        let instructions = vec![Instruction::bare(Opcode::NOT)];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::StackUnderflow));
    }

    #[test]
    fn geq_on_short_stack_underflows_not_overflows() {
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_f64(1.0)),
            Instruction::bare(Opcode::GEQ),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::StackUnderflow));
    }

    #[test]
    fn geq_compares_top_against_below_top() {
        // push 1.0 (below); push 2.0 (top); geq -> top(2.0) >= below(1.0) -> 1
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_f64(1.0)),
            Instruction::new(Opcode::PUSH, Word::from_f64(2.0)),
            Instruction::bare(Opcode::GEQ),
            Instruction::bare(Opcode::HALT),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.stack().last().unwrap().u64(), 1);
    }

    #[test]
    fn dup_rel_at_stack_size_underflows() {
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_u64(7)),
            Instruction::new(Opcode::DUP_REL, Word::from_i64(1)),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::StackUnderflow));
    }

    #[test]
    fn dup_rel_with_negative_operand_is_illegal() {
        let instructions = vec![
            Instruction::new(Opcode::PUSH, Word::from_u64(7)),
            Instruction::new(Opcode::DUP_REL, Word::from_i64(-1)),
        ];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::IllegalOperand));
    }

    #[test]
    fn jump_past_program_end_traps_on_next_fetch_not_on_the_jump() {
        let instructions = vec![Instruction::new(Opcode::JMP, Word::from_u64(1))];
        let vm = run_program(instructions, -1);
        assert_eq!(
            vm.state(),
            State::Trapped(TrapKind::IllegalInstructionAccess)
        );
    }

    #[test]
    fn halt_is_terminal_and_further_steps_are_inert() {
        let instructions = vec![Instruction::bare(Opcode::HALT)];
        let mut vm = Interpreter::new(Program::new(instructions).unwrap());
        vm.step();
        assert!(vm.is_halted());
        let before: Vec<u64> = vm.stack().iter().map(|w| w.u64()).collect();
        vm.step();
        let after: Vec<u64> = vm.stack().iter().map(|w| w.u64()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn illegal_instruction_index_traps() {
        let instructions = vec![Instruction::from_raw(9999, Word::default())];
        let vm = run_program(instructions, -1);
        assert_eq!(vm.state(), State::Trapped(TrapKind::IllegalInstruction));
    }
}
