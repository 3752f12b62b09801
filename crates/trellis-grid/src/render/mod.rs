//! Rendering strategies for the grid's render targets.
//!
//! Markup generation is an external collaborator's concern; a renderer here
//! describes *what* a pass would draw by appending structured
//! [`RenderOp`] records to the [`RenderContext`]. The coordination layer
//! only guarantees when and in what order renderers run, and which
//! strategy is selected per target.

mod freeze;

pub use freeze::{FreezeContentRender, FreezeHeaderRender};

use trellis_core::{RenderTarget, Result};

use crate::models::{AggregateRow, Column};

/// Which pane of a split target an op belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Unsplit target.
    Single,
    /// The left, non-scrolling pane of a frozen split.
    Frozen,
    /// The scrolling pane of a frozen split.
    Movable,
}

/// One recorded unit of rendering work.
#[derive(Debug, Clone)]
pub struct RenderOp {
    pub target: RenderTarget,
    pub pane: Pane,
    /// Column fields (or footer captions) the op covers, in draw order.
    pub cells: Vec<String>,
}

/// Snapshot of the model state a render pass works from, plus the op log
/// the pass produces.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub columns: Vec<Column>,
    pub frozen_columns: usize,
    pub frozen_rows: usize,
    pub aggregates: Vec<AggregateRow>,
    pub ops: Vec<RenderOp>,
}

impl RenderContext {
    /// Fields of the currently visible columns, in column order.
    pub fn visible_fields(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| column.visible)
            .map(|column| column.field.clone())
            .collect()
    }

    pub fn push_op(&mut self, target: RenderTarget, pane: Pane, cells: Vec<String>) {
        self.ops.push(RenderOp {
            target,
            pane,
            cells,
        });
    }

    /// Ops recorded for one target, in emission order.
    pub fn ops_for(&self, target: RenderTarget) -> Vec<&RenderOp> {
        self.ops.iter().filter(|op| op.target == target).collect()
    }
}

/// A rendering strategy for one render target.
///
/// Selected through the renderer factory; the default strategies below can
/// be displaced by a module that registers first (see the freeze module).
pub trait Renderer: Send + Sync {
    fn render(&self, ctx: &mut RenderContext) -> Result<()>;
}

/// Default header pass: one unsplit row of visible column captions.
#[derive(Default)]
pub struct HeaderRender;

impl Renderer for HeaderRender {
    fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        let fields = ctx.visible_fields();
        ctx.push_op(RenderTarget::Header, Pane::Single, fields);
        Ok(())
    }
}

/// Default content pass: one unsplit body over the visible columns.
#[derive(Default)]
pub struct ContentRender;

impl Renderer for ContentRender {
    fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        let fields = ctx.visible_fields();
        ctx.push_op(RenderTarget::Content, Pane::Single, fields);
        Ok(())
    }
}

/// Default footer pass: one row of summary captions per aggregate row.
#[derive(Default)]
pub struct FooterRender;

impl Renderer for FooterRender {
    fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        let rows: Vec<Vec<String>> = ctx
            .aggregates
            .iter()
            .map(|row| row.columns.iter().map(|cell| cell.caption()).collect())
            .collect();
        for cells in rows {
            ctx.push_op(RenderTarget::Footer, Pane::Single, cells);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateColumn, AggregateKind};

    fn context() -> RenderContext {
        RenderContext {
            columns: vec![
                Column::new("EmployeeID"),
                Column::new("Name"),
                Column::new("Secret").hidden(),
            ],
            ..RenderContext::default()
        }
    }

    #[test]
    fn test_header_renders_visible_columns_unsplit() {
        let mut ctx = context();
        HeaderRender.render(&mut ctx).unwrap();

        let ops = ctx.ops_for(RenderTarget::Header);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].pane, Pane::Single);
        assert_eq!(ops[0].cells, vec!["EmployeeID", "Name"]);
    }

    #[test]
    fn test_footer_renders_one_op_per_aggregate_row() {
        let mut ctx = context();
        ctx.aggregates = vec![
            AggregateRow::new(vec![AggregateColumn::new("Freight", AggregateKind::Sum)]),
            AggregateRow::new(vec![
                AggregateColumn::new("Freight", AggregateKind::Average).with_footer_text("Avg"),
            ]),
        ];
        FooterRender.render(&mut ctx).unwrap();

        let ops = ctx.ops_for(RenderTarget::Footer);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].cells, vec!["sum(Freight)"]);
        assert_eq!(ops[1].cells, vec!["Avg"]);
    }
}
