//! Built-in mutator catalogue.

pub mod arithmetic;
pub mod branch;
pub mod expression;
pub mod loops;
pub mod numbers;
pub mod statement;

use crate::registry::Registry;

pub fn register_all(reg: &mut Registry) {
    reg.register("arithmetic/base", arithmetic::base);
    reg.register("arithmetic/bitwise", arithmetic::bitwise);
    reg.register("arithmetic/assignment", arithmetic::assignment);
    reg.register("arithmetic/assign_invert", arithmetic::assign_invert);
    reg.register("branch/if", branch::mutate_if);
    reg.register("branch/else", branch::mutate_else);
    reg.register("expression/remove", expression::remove_term);
    reg.register("loop/break", loops::break_loop);
    reg.register("loop/condition", loops::condition);
    reg.register("loop/range_break", loops::range_break);
    reg.register("numbers/incrementer", numbers::incrementer);
    reg.register("numbers/decrementer", numbers::decrementer);
    reg.register("statement/remove", statement::remove);
}
