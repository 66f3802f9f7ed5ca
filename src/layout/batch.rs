use rayon::prelude::*;

use crate::foundation::error::{KfxError, KfxResult};
use crate::layout::oracle::GlyphOracle;
use crate::layout::resolver::resolve_line;
use crate::script::document::Document;

/// Lay out every line of a prepared document on a rayon pool.
///
/// Each worker thread builds its own oracle through `make_oracle`, so
/// non-reentrant shaping contexts are never shared. Results are identical to
/// [`Document::layout`].
#[tracing::instrument(skip(doc, make_oracle), fields(lines = doc.lines.len()))]
pub fn layout_lines_parallel<O, F>(
    doc: &mut Document,
    threads: Option<usize>,
    make_oracle: F,
) -> KfxResult<()>
where
    O: GlyphOracle,
    F: Fn() -> O + Sync + Send,
{
    if !doc.is_prepared() {
        return Err(KfxError::validation(
            "document must be prepared before layout",
        ));
    }
    let frame = doc.meta.frame()?;
    let pool = build_thread_pool(threads)?;

    let styles = &doc.styles;
    let options = &doc.options;
    let lines = &mut doc.lines;

    pool.install(|| {
        lines
            .par_iter_mut()
            .try_for_each_init(&make_oracle, |oracle, line| -> KfxResult<()> {
                let Some(id) = line.style_id else {
                    tracing::warn!(
                        line = line.index,
                        style = %line.style,
                        "skipping line with unknown style"
                    );
                    return Ok(());
                };
                resolve_line(line, styles.get(id)?, frame, options, oracle)
            })
    })
}

fn build_thread_pool(threads: Option<usize>) -> KfxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(KfxError::validation(
            "layout 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KfxError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/batch.rs"]
mod tests;
