use crate::error::CoreResult;
use crate::render::pass::RenderTarget;
use crate::render::runs::RenderedRun;

/// Render target that writes inline HTML: one `<span>` per highlight run,
/// escaped text for everything else.
#[derive(Debug, Default, Clone)]
pub struct HtmlTarget {
    html: String,
    selected: Option<String>,
}

impl HtmlTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark runs covering `id` with `data-selected` on the next install.
    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl RenderTarget for HtmlTarget {
    fn clear(&mut self) {
        self.html.clear();
    }

    fn install(&mut self, runs: &[RenderedRun]) -> CoreResult<()> {
        for run in runs {
            match run {
                RenderedRun::Plain { text, .. } => self.html.push_str(&escape_html(text)),
                RenderedRun::Highlight {
                    text,
                    color,
                    annotation_id,
                    tooltip,
                    ..
                } => {
                    let selected = self
                        .selected
                        .as_deref()
                        .map(|id| run.covers(id))
                        .unwrap_or(false);
                    self.html.push_str(&format!(
                        "<span class=\"hl\" data-annotation-id=\"{}\"{} style=\"background-color: {}\" title=\"{}\">{}</span>",
                        escape_html(annotation_id),
                        if selected { " data-selected=\"true\"" } else { "" },
                        color.css(),
                        escape_html(tooltip),
                        escape_html(text),
                    ));
                }
            }
        }
        Ok(())
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
