//! Lowering, saturation and rebuilding for trigonometric expansion.

use argand_core::{ExprHandle, ExprNode, Func};
use egg::{Extractor, Id, RecExpr, Rewrite, Runner, Symbol};
use tracing::debug;

use crate::context::Context;
use crate::trig::cost::TrigCost;
use crate::trig::language::TrigLang;
use crate::trig::rules;

/// Largest integer multiple `n*a` rewritten to `a + a + ...` before
/// saturation.
const MAX_ANGLE_MULTIPLE: i64 = 8;

/// Configuration for the trigonometric e-graph runner.
#[derive(Clone, Debug)]
pub struct TrigConfig {
    /// Maximum number of iterations.
    pub iter_limit: usize,
    /// Maximum number of nodes in the e-graph.
    pub node_limit: usize,
    /// Time limit in seconds.
    pub time_limit_secs: u64,
}

impl Default for TrigConfig {
    fn default() -> Self {
        Self {
            iter_limit: 30,
            node_limit: 10_000,
            time_limit_secs: 5,
        }
    }
}

/// Statistics about one expansion.
#[derive(Clone, Debug)]
pub struct TrigStats {
    /// Number of iterations run.
    pub iterations: usize,
    /// Total nodes in the e-graph.
    pub egraph_nodes: usize,
    /// Number of equivalence classes.
    pub egraph_classes: usize,
    /// Reason the runner stopped.
    pub stop_reason: String,
}

/// Expands `sin` and `cos` of sums and integer multiples.
#[derive(Clone)]
pub struct TrigExpander {
    config: TrigConfig,
    rules: Vec<Rewrite<TrigLang, ()>>,
}

impl Default for TrigExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl TrigExpander {
    /// Creates an expander with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TrigConfig::default())
    }

    /// Creates an expander with custom limits.
    #[must_use]
    pub fn with_config(config: TrigConfig) -> Self {
        Self {
            config,
            rules: rules::rules(),
        }
    }

    /// Returns the runner limits.
    #[must_use]
    pub fn config(&self) -> &TrigConfig {
        &self.config
    }

    /// Expands the `sin` or `cos` application `h`.
    ///
    /// Returns `None` if `h` is not such an application or nothing changed.
    pub fn expand(&self, ctx: &mut Context, h: ExprHandle) -> Option<ExprHandle> {
        self.expand_with_stats(ctx, h).map(|(result, _)| result)
    }

    /// Like [`TrigExpander::expand`], also returning runner statistics.
    pub fn expand_with_stats(
        &self,
        ctx: &mut Context,
        h: ExprHandle,
    ) -> Option<(ExprHandle, TrigStats)> {
        if !matches!(
            ctx.node(h),
            ExprNode::Apply {
                func: Func::Sin | Func::Cos,
                ..
            }
        ) {
            return None;
        }

        let mut lowering = Lowering::default();
        lowering.lower(ctx, h);
        let start = lowering.expr;

        let runner = Runner::default()
            .with_expr(&start)
            .with_iter_limit(self.config.iter_limit)
            .with_node_limit(self.config.node_limit)
            .with_time_limit(std::time::Duration::from_secs(self.config.time_limit_secs))
            .run(&self.rules);

        let stats = TrigStats {
            iterations: runner.iterations.len(),
            egraph_nodes: runner.egraph.total_number_of_nodes(),
            egraph_classes: runner.egraph.number_of_classes(),
            stop_reason: format!("{:?}", runner.stop_reason),
        };
        debug!(
            iterations = stats.iterations,
            nodes = stats.egraph_nodes,
            classes = stats.egraph_classes,
            stop = %stats.stop_reason,
            "trig saturation finished"
        );

        let extractor = Extractor::new(&runner.egraph, TrigCost);
        let (_, best) = extractor.find_best(runner.roots[0]);

        let nodes = best.as_ref();
        let root = Id::from(nodes.len().checked_sub(1)?);
        let result = raise(ctx, nodes, root, &lowering.leaves)?;
        (result != h).then_some((result, stats))
    }
}

/// Translation of an expression into [`TrigLang`].
#[derive(Default)]
struct Lowering {
    expr: RecExpr<TrigLang>,
    leaves: Vec<ExprHandle>,
}

impl Lowering {
    fn lower(&mut self, ctx: &mut Context, h: ExprHandle) -> Id {
        match ctx.node(h).clone() {
            ExprNode::Apply {
                func: Func::Sin,
                args,
            } if args.len() == 1 => {
                let a = self.lower(ctx, args[0]);
                self.expr.add(TrigLang::Sin(a))
            }
            ExprNode::Apply {
                func: Func::Cos,
                args,
            } if args.len() == 1 => {
                let a = self.lower(ctx, args[0]);
                self.expr.add(TrigLang::Cos(a))
            }
            ExprNode::Add(terms) => {
                let mut ids = terms.iter().map(|&t| self.lower(ctx, t)).collect::<Vec<_>>();
                let mut acc = ids.pop().unwrap_or_else(|| self.expr.add(TrigLang::Num(0)));
                while let Some(id) = ids.pop() {
                    acc = self.expr.add(TrigLang::Add([id, acc]));
                }
                acc
            }
            ExprNode::Mul(factors) => match ctx.as_i64(factors[0]) {
                // n*a = a + a + ... for small n
                Some(n) if (2..=MAX_ANGLE_MULTIPLE).contains(&n) => {
                    let rest = ctx.mul(&factors[1..]);
                    let a = self.lower(ctx, rest);
                    let mut acc = a;
                    for _ in 1..n {
                        acc = self.expr.add(TrigLang::Add([a, acc]));
                    }
                    acc
                }
                _ => self.leaf(h),
            },
            ExprNode::Number(_) => match ctx.as_i64(h) {
                Some(n) => self.expr.add(TrigLang::Num(n)),
                None => self.leaf(h),
            },
            _ => self.leaf(h),
        }
    }

    fn leaf(&mut self, h: ExprHandle) -> Id {
        let index = match self.leaves.iter().position(|&l| l == h) {
            Some(i) => i,
            None => {
                self.leaves.push(h);
                self.leaves.len() - 1
            }
        };
        self.expr
            .add(TrigLang::Symbol(Symbol::from(format!("h{index}"))))
    }
}

/// Rebuilds an extracted [`TrigLang`] term through the constructors.
fn raise(ctx: &mut Context, nodes: &[TrigLang], id: Id, leaves: &[ExprHandle]) -> Option<ExprHandle> {
    let h = match &nodes[usize::from(id)] {
        TrigLang::Num(n) => ctx.integer(*n),
        TrigLang::Symbol(s) => {
            let index: usize = s.as_str().strip_prefix('h')?.parse().ok()?;
            *leaves.get(index)?
        }
        TrigLang::Add([a, b]) => {
            let a = raise(ctx, nodes, *a, leaves)?;
            let b = raise(ctx, nodes, *b, leaves)?;
            ctx.add(&[a, b])
        }
        TrigLang::Mul([a, b]) => {
            let a = raise(ctx, nodes, *a, leaves)?;
            let b = raise(ctx, nodes, *b, leaves)?;
            ctx.mul(&[a, b])
        }
        TrigLang::Sin(a) => {
            let a = raise(ctx, nodes, *a, leaves)?;
            ctx.sin(a)
        }
        TrigLang::Cos(a) => {
            let a = raise(ctx, nodes, *a, leaves)?;
            ctx.cos(a)
        }
    };
    Some(h)
}
