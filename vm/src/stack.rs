use crate::error::Trap;

/// Fixed-capacity boolean operand stack for evaluating postfix programs.
pub struct OperandStack {
    data: Vec<bool>,
    max_depth: usize,
}

impl OperandStack {
    /// Creates a new operand stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        OperandStack {
            data: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    pub fn push(&mut self, value: bool) -> Result<(), Trap> {
        if self.data.len() >= self.max_depth {
            return Err(Trap::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<bool, Trap> {
        self.data.pop().ok_or(Trap::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
