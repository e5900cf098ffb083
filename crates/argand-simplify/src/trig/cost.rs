//! Cost function for extracting expanded forms.

use egg::{CostFunction, Id, Language};

use crate::trig::language::TrigLang;

/// Prefers `sin`/`cos` of small arguments.
///
/// A trigonometric node costs `1 + 8 * c^2` where `c` is the cost of its
/// argument; every other node costs one plus its children.
#[derive(Default)]
pub struct TrigCost;

impl CostFunction<TrigLang> for TrigCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &TrigLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        match enode {
            TrigLang::Sin(arg) | TrigLang::Cos(arg) => {
                let c = costs(*arg);
                c.saturating_mul(c).saturating_mul(8).saturating_add(1)
            }
            _ => enode.fold(1, |sum, id| sum.saturating_add(costs(id))),
        }
    }
}
