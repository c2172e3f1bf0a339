//! Repeating tables that flow across continuation pages.
use crate::LayoutError;
use crate::algorithms::pagination::paginate_rows;
use crate::fonts::FontFace;
use crate::interface::{ElementLayout, LayoutContext};
use crate::output::{GlyphRun, Primitive, RowPlan};
use crate::text::builder::{LineFrame, LineSpec, build_line};
use crate::text::wrapper::wrap_paragraphs;
use titlepress_template::{Padding, TableElement};
use titlepress_types::Rect;

/// Text style shared by the cells of one row.
struct RowStyle<'a> {
    face: &'a FontFace,
    size: f32,
    step: f32,
}

/// A measured row, positioned relative to its own top edge.
struct MeasuredRow {
    height: f32,
    first_line_offset: f32,
    cells: Vec<Vec<(String, bool)>>,
}

fn measure_row(
    ctx: &LayoutContext<'_>,
    table: &TableElement,
    style: &RowStyle<'_>,
    cells: &[String],
) -> MeasuredRow {
    let padding: Padding = table.padding;
    let wrapped: Vec<Vec<(String, bool)>> = table
        .columns
        .iter()
        .zip(cells)
        .map(|(column, text)| {
            let width = column.width - padding.horizontal();
            wrap_paragraphs(text, width, true, &|s: &str| style.face.measure(s, style.size))
        })
        .collect();

    let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let first_line_offset = ctx.round_up(padding.top);
    let height = ctx.round_up(first_line_offset + lines as f32 * style.step + padding.bottom);
    MeasuredRow {
        height,
        first_line_offset,
        cells: wrapped,
    }
}

fn place_row(
    ctx: &LayoutContext<'_>,
    table: &TableElement,
    style: &RowStyle<'_>,
    row: &MeasuredRow,
    top: f32,
    row_index: Option<usize>,
) -> Primitive {
    let mut runs: Vec<GlyphRun> = Vec::new();
    let mut column_x = table.x;
    for (column, lines) in table.columns.iter().zip(&row.cells) {
        for (i, (line, paragraph_end)) in lines.iter().enumerate() {
            let spec = LineSpec {
                face: style.face,
                size: style.size,
                frame: LineFrame::Box {
                    x: column_x + table.padding.left,
                    width: column.width - table.padding.horizontal(),
                },
                align: column.align,
                paragraph_end: *paragraph_end,
                line_top: top + row.first_line_offset + i as f32 * style.step,
                element: ctx.element,
            };
            runs.extend(build_line(line, &spec));
        }
        column_x += column.width;
    }
    Primitive::TableRow(RowPlan {
        element: ctx.element,
        row_index,
        rect: Rect::new(table.x, top, table.total_width(), row.height),
        runs,
    })
}

/// Places the header and one row per bound entry, splitting the rows over
/// continuation pages with [`paginate_rows`].
pub fn layout_table(
    ctx: &mut LayoutContext<'_>,
    table: &TableElement,
    rows: &[Vec<String>],
) -> Result<ElementLayout, LayoutError> {
    let body_face = ctx.face(&table.font)?.clone();
    let header_face = ctx.face(table.header_font())?.clone();
    let body_style = RowStyle {
        face: &body_face,
        size: table.size,
        step: ctx.step(table.leading()),
    };
    let header_style = RowStyle {
        face: &header_face,
        size: table.header_size(),
        step: ctx.step(table.header_leading()),
    };

    let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
    let has_header = headers.iter().any(|h| !h.is_empty());
    let header = measure_row(ctx, table, &header_style, &headers);
    let header_block = if has_header {
        header.height + table.header_gap()
    } else {
        0.0
    };

    let measured: Vec<MeasuredRow> = rows
        .iter()
        .map(|cells| measure_row(ctx, table, &body_style, cells))
        .collect();
    let heights: Vec<f32> = measured.iter().map(|r| r.height).collect();

    let limit = ctx.flow_limit();
    let first_top = ctx.snap(table.y);
    let first_body = ctx.snap(first_top + header_block);
    let next_top = ctx.snap(table.continue_at.unwrap_or(ctx.page.margins.top));
    let header_body = ctx.snap(next_top + header_block);
    let next_body = if table.repeat_header {
        header_body
    } else {
        next_top
    };

    let mut fragments = paginate_rows(
        &heights,
        limit - first_body,
        limit - next_body,
        ctx.min_rows,
    )
    .map_err(|err| LayoutError::ElementTooLarge {
        element: ctx.element,
        height: err.height,
        available: err.available,
    })?;

    // A header drawn only once goes with the first rows. When those rows
    // leave the first page, paginate again with room for the header on the
    // second.
    let mut header_fragment = 0;
    let first_page_emptied = fragments.first().is_some_and(|r| r.is_empty());
    if has_header && !table.repeat_header && !rows.is_empty() && first_page_emptied {
        let moved = [ctx.min_rows, 1].into_iter().find_map(|min_rows| {
            paginate_rows(&heights, limit - header_body, limit - next_body, min_rows)
                .ok()
                .filter(|rest| rest.first().is_some_and(|r| !r.is_empty()))
        });
        if let Some(rest) = moved {
            fragments = std::iter::once(0..0).chain(rest).collect();
            header_fragment = 1;
        }
    }

    log::debug!(
        "{} places {} rows in {} fragments",
        ctx.element,
        rows.len(),
        fragments.len()
    );

    let mut pages = Vec::with_capacity(fragments.len());
    for (i, range) in fragments.into_iter().enumerate() {
        let draw_header = has_header
            && if table.repeat_header {
                !range.is_empty() || rows.is_empty()
            } else {
                i == header_fragment
            };
        let (top, body) = match (i > 0, draw_header) {
            (false, _) => (first_top, first_body),
            (true, true) => (next_top, header_body),
            (true, false) => (next_top, next_body),
        };

        let mut primitives = Vec::with_capacity(range.len() + 1);
        if draw_header {
            primitives.push(place_row(ctx, table, &header_style, &header, top, None));
        }
        let mut cursor = body;
        for index in range {
            let row = &measured[index];
            primitives.push(place_row(ctx, table, &body_style, row, cursor, Some(index)));
            cursor += row.height;
        }
        pages.push(primitives);
    }

    let mut pages = pages.into_iter();
    Ok(ElementLayout {
        primary: pages.next().unwrap_or_default(),
        continuations: pages.collect(),
    })
}
