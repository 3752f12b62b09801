//! Specialized renderers for frozen-column layouts.
//!
//! Registered by the freeze module during `initialLoad`, before the host
//! registers the defaults, so the first-write-wins factory selects these
//! for the header and content targets whenever columns are frozen.

use trellis_core::{RenderTarget, Result};

use super::{Pane, RenderContext, Renderer};

fn split_visible(ctx: &RenderContext) -> (Vec<String>, Vec<String>) {
    // The frozen count is defined over column order, not visible order:
    // a hidden column inside the frozen range still consumes a slot.
    let mut frozen = Vec::new();
    let mut movable = Vec::new();
    for (index, column) in ctx.columns.iter().enumerate() {
        if !column.visible {
            continue;
        }
        if index < ctx.frozen_columns {
            frozen.push(column.field.clone());
        } else {
            movable.push(column.field.clone());
        }
    }
    (frozen, movable)
}

/// Header pass split into a frozen and a movable pane.
#[derive(Default)]
pub struct FreezeHeaderRender;

impl Renderer for FreezeHeaderRender {
    fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        let (frozen, movable) = split_visible(ctx);
        ctx.push_op(RenderTarget::Header, Pane::Frozen, frozen);
        ctx.push_op(RenderTarget::Header, Pane::Movable, movable);
        Ok(())
    }
}

/// Content pass split into a frozen and a movable pane.
#[derive(Default)]
pub struct FreezeContentRender;

impl Renderer for FreezeContentRender {
    fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        let (frozen, movable) = split_visible(ctx);
        ctx.push_op(RenderTarget::Content, Pane::Frozen, frozen);
        ctx.push_op(RenderTarget::Content, Pane::Movable, movable);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_header_splits_at_frozen_count() {
        let mut ctx = RenderContext {
            columns: vec![
                Column::new("EmployeeID"),
                Column::new("Name"),
                Column::new("Region"),
            ],
            frozen_columns: 1,
            ..RenderContext::default()
        };
        FreezeHeaderRender.render(&mut ctx).unwrap();

        let ops = ctx.ops_for(RenderTarget::Header);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].pane, Pane::Frozen);
        assert_eq!(ops[0].cells, vec!["EmployeeID"]);
        assert_eq!(ops[1].pane, Pane::Movable);
        assert_eq!(ops[1].cells, vec!["Name", "Region"]);
    }

    #[test]
    fn test_hidden_column_in_frozen_range_keeps_its_slot() {
        let mut ctx = RenderContext {
            columns: vec![
                Column::new("EmployeeID").hidden(),
                Column::new("Name"),
                Column::new("Region"),
            ],
            frozen_columns: 2,
            ..RenderContext::default()
        };
        FreezeContentRender.render(&mut ctx).unwrap();

        let ops = ctx.ops_for(RenderTarget::Content);
        assert_eq!(ops[0].cells, vec!["Name"]);
        assert_eq!(ops[1].cells, vec!["Region"]);
    }
}
