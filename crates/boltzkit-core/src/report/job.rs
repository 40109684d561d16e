use super::page;
use crate::core::utils::html::{escape, js_string_literal};
use crate::engine::invoker::RunOutcome;

const VIEWER_LIBRARY: &str = r#"    <script src="https://3Dmol.org/build/3Dmol-min.js"></script>"#;

const JOB_STYLES: &str = r#"
    .boltz-container {
        border: 1px solid var(--border);
        border-radius: 10px;
        padding: 20px;
        box-shadow: 0 4px 8px rgba(0,0,0,0.05);
    }
    .boltz-container h1, .boltz-container h2, .boltz-container h3 {
        color: #257AE1;
        border-bottom: 2px solid var(--accent);
        padding-bottom: 5px;
        margin-top: 20px;
    }
    .boltz-container h1 { text-align: center; font-size: 2em; color: var(--primary); border-bottom: none; }
    .job-name-span {
        font-family: 'Roboto Mono', monospace;
        background-color: #eeeeee;
        color: #922DF0;
        padding: 3px 8px;
        border-radius: 5px;
    }
    .output-box {
        background-color: var(--surface);
        border: 1px solid var(--border);
        border-radius: 5px;
        padding: 15px;
        white-space: pre-wrap;
        word-wrap: break-word;
        max-height: 400px;
        overflow-y: auto;
        font-family: 'Roboto Mono', monospace;
        font-size: 0.9em;
    }
    .output-box.success { border-left: 5px solid var(--success); }
    .output-box.error { border-left: 5px solid var(--danger); color: #c62828; }
    .viz-container { display: flex; flex-wrap: wrap; gap: 20px; margin-top: 20px; }
    .viz-viewer {
        flex: 2;
        min-width: 500px;
        height: 500px;
        background-color: var(--surface);
        border: 1px solid var(--border);
        border-radius: 8px;
        position: relative;
    }
    .viz-options {
        flex: 1;
        min-width: 280px;
        border: 1px solid var(--border);
        border-radius: 8px;
        padding: 15px;
    }
    .viz-options label { display: block; margin-bottom: 6px; font-weight: 500; }
    .viz-options select, .viz-options input[type="number"], .viz-options button {
        width: 100%;
        box-sizing: border-box;
        padding: 8px;
        margin-bottom: 20px;
        border: 1px solid #ccc;
        border-radius: 4px;
    }
    .viz-options button { background-color: #1976d2; color: white; border: none; cursor: pointer; }
"#;

const VIEWER_SCRIPT: &str = r#"
    let viewer = null;
    const gradientSchemes = ['roygb'];

    function readBound(id, fallback) {
        const value = parseFloat(document.getElementById(id).value);
        return isNaN(value) ? fallback : value;
    }

    function togglePlddtOptions() {
        const style = document.getElementById('styleSelect').value;
        const colorSelect = document.getElementById('colorSchemeSelect');
        const isCartoon = style === 'cartoon';
        document.getElementById('plddtOptionsContainer').style.display = isCartoon ? 'block' : 'none';
        document.querySelectorAll('.plddt-option').forEach(opt => { opt.disabled = !isCartoon; });
        if (colorSelect.options[colorSelect.selectedIndex].disabled) {
            colorSelect.value = 'chain';
        }
    }

    function updateViewer() {
        if (!viewer) return;
        viewer.clear();
        viewer.addModel(pdbData, 'pdb');

        const style = document.getElementById('styleSelect').value;
        const colorScheme = document.getElementById('colorSchemeSelect').value;
        const bMin = readBound('bFactorMin', viewerDefaults.min);
        const bMax = readBound('bFactorMax', viewerDefaults.max);

        let styleObj = {};
        if (style === 'cartoon' && gradientSchemes.includes(colorScheme)) {
            styleObj = { cartoon: { colorscheme: { prop: 'b', gradient: colorScheme, min: bMin, max: bMax } } };
        } else {
            styleObj[style] = { colorscheme: colorScheme };
        }

        viewer.setStyle({}, styleObj);
        viewer.addStyle({ hetflag: true }, { stick: { colorscheme: 'default' } });
        viewer.zoomTo();
        viewer.render();
    }

    function handleStyleChange() {
        togglePlddtOptions();
        updateViewer();
    }

    function resetZoom() {
        if (viewer) viewer.zoomTo();
    }

    window.addEventListener('load', () => {
        const element = document.getElementById('mol_viewer');
        if (!element || !pdbData) {
            console.error('Viewer element or PDB data not found.');
            return;
        }
        viewer = $3Dmol.createViewer(element, { backgroundColor: 'white' });
        togglePlddtOptions();
        updateViewer();
    });
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStyle {
    Cartoon,
    Sphere,
    Stick,
    Line,
}

impl ViewerStyle {
    const ALL: [(ViewerStyle, &'static str, &'static str); 4] = [
        (ViewerStyle::Cartoon, "cartoon", "Cartoon"),
        (ViewerStyle::Sphere, "sphere", "Sphere"),
        (ViewerStyle::Stick, "stick", "Stick"),
        (ViewerStyle::Line, "line", "Line"),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    /// pLDDT gradient read from the B-factor column; cartoon only.
    Rainbow,
    GreenCarbon,
    Chain,
    Element,
}

impl ColorScheme {
    fn value(&self) -> &'static str {
        match self {
            ColorScheme::Rainbow => "roygb",
            ColorScheme::GreenCarbon => "greenCarbon",
            ColorScheme::Chain => "chain",
            ColorScheme::Element => "default",
        }
    }
}

/// Initial state of the viewer controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSettings {
    pub style: ViewerStyle,
    pub color_scheme: ColorScheme,
    pub gradient_min: f64,
    pub gradient_max: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            style: ViewerStyle::Cartoon,
            color_scheme: ColorScheme::Rainbow,
            gradient_min: 50.0,
            gradient_max: 90.0,
        }
    }
}

/// What the structure section of a run report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureView<'a> {
    /// PDB text to embed in the viewer.
    Embedded(&'a str),
    /// The run succeeded but produced no structure file.
    NotFound,
    /// The run failed, so no structure is expected.
    Skipped,
}

pub struct RunReport<'a> {
    pub job_name: &'a str,
    pub outcome: &'a RunOutcome,
    pub structure: StructureView<'a>,
    pub viewer: ViewerSettings,
}

impl<'a> RunReport<'a> {
    pub fn new(job_name: &'a str, outcome: &'a RunOutcome, structure: StructureView<'a>) -> Self {
        Self {
            job_name,
            outcome,
            structure,
            viewer: ViewerSettings::default(),
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        body.push_str(&format!(
            r#"<div class="boltz-container">
    <h1>Boltz2 Results: <span class="job-name-span">{}</span></h1>
    <div class="section">
        <h2>Job Output</h2>
        {}
    </div>
"#,
            escape(self.job_name),
            self.log_section()
        ));

        let head_extra = if let StructureView::Embedded(pdb) = self.structure {
            body.push_str(&self.viewer_section());
            format!(
                "{}\n    <script>\n    const pdbData = {};\n    const viewerDefaults = {{ min: {:?}, max: {:?} }};\n{}    </script>",
                VIEWER_LIBRARY,
                js_string_literal(pdb),
                self.viewer.gradient_min,
                self.viewer.gradient_max,
                VIEWER_SCRIPT
            )
        } else {
            String::new()
        };
        body.push_str("</div>\n");

        page::document(
            &format!("Boltz2 Results: {}", self.job_name),
            &head_extra,
            JOB_STYLES,
            &body,
        )
    }

    fn log_section(&self) -> String {
        let log = escape(&self.outcome.log_text());
        if !self.outcome.is_success() {
            return format!(
                r#"<h2>Job Failed</h2><pre class="output-box error">{}</pre>"#,
                log
            );
        }
        let mut html = format!(r#"<pre class="output-box success">{}</pre>"#, log);
        if self.structure == StructureView::NotFound {
            html.push_str(r#"<pre class="output-box error">Error: No model PDB file found.</pre>"#);
        }
        html
    }

    fn viewer_section(&self) -> String {
        let style_options: String = ViewerStyle::ALL
            .iter()
            .map(|(style, value, label)| {
                let selected = if *style == self.viewer.style { " selected" } else { "" };
                format!(r#"<option value="{value}"{selected}>{label}</option>"#)
            })
            .collect::<Vec<_>>()
            .join("\n                        ");

        let option = |scheme: ColorScheme, label: &str, class: &str| {
            let selected = if scheme == self.viewer.color_scheme { " selected" } else { "" };
            format!(
                r#"<option{class} value="{}"{selected}>{label}</option>"#,
                scheme.value()
            )
        };

        format!(
            r#"    <div class="section">
        <h2>Protein Structure Visualization</h2>
        <div class="viz-container">
            <div class="viz-viewer">
                <div id="mol_viewer" style="width:100%; height:100%;"></div>
            </div>
            <div class="viz-options">
                <h3>Display Options</h3>
                <label for="styleSelect">Style:</label>
                <select id="styleSelect" onchange="handleStyleChange()">
                        {style_options}
                </select>
                <label for="colorSchemeSelect">Color Scheme:</label>
                <select id="colorSchemeSelect" onchange="updateViewer()">
                    <optgroup label="pLDDT Gradient (Cartoon)">
                        {rainbow}
                    </optgroup>
                    <optgroup label="General Coloring">
                        {green}
                        {chain}
                        {element}
                    </optgroup>
                </select>
                <div id="plddtOptionsContainer">
                    <label for="bFactorMin">pLDDT Min (for Gradient):</label>
                    <input type="number" id="bFactorMin" value="{min}" step="1" min="1" onchange="updateViewer()">
                    <label for="bFactorMax">pLDDT Max (for Gradient):</label>
                    <input type="number" id="bFactorMax" value="{max}" step="1" min="1" onchange="updateViewer()">
                </div>
                <button onclick="resetZoom()">Reset Zoom</button>
            </div>
        </div>
    </div>
"#,
            style_options = style_options,
            rainbow = option(ColorScheme::Rainbow, "Rainbow", r#" class="plddt-option""#),
            green = option(ColorScheme::GreenCarbon, "Green Carbon", ""),
            chain = option(ColorScheme::Chain, "By Chain", ""),
            element = option(ColorScheme::Element, "By Element", ""),
            min = self.viewer.gradient_min,
            max = self.viewer.gradient_max,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> RunOutcome {
        RunOutcome::Succeeded {
            stdout: "Predicting DataLoader 0: 100%".to_string(),
            stderr: "warning: <deprecated>".to_string(),
        }
    }

    #[test]
    fn failed_run_reports_exit_code_and_diagnostics() {
        let outcome = RunOutcome::Failed {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "CUDA OOM".to_string(),
        };

        let html = RunReport::new("T1", &outcome, StructureView::Skipped).render();

        assert!(html.contains("<h2>Job Failed</h2>"));
        assert!(html.contains("Exit Code: 1"));
        assert!(html.contains("CUDA OOM"));
        assert!(!html.contains("mol_viewer"));
    }

    #[test]
    fn successful_run_without_structure_says_so() {
        let outcome = success();

        let html = RunReport::new("T1", &outcome, StructureView::NotFound).render();

        assert!(html.contains(r#"<pre class="output-box success">STDOUT:"#));
        assert!(html.contains("No model PDB file found"));
        assert!(html.contains("warning: &lt;deprecated&gt;"));
    }

    #[test]
    fn embedded_structure_is_a_safe_script_string() {
        let outcome = success();
        let pdb = "ATOM      1  N   MET A   1\nREMARK </script>\nEND\n";

        let html = RunReport::new("T1", &outcome, StructureView::Embedded(pdb)).render();

        assert!(html.contains("3Dmol-min.js"));
        assert!(html.contains(r#"const pdbData = "ATOM      1  N   MET A   1\nREMARK <\/script>\nEND\n";"#));
        assert!(html.contains("const viewerDefaults = { min: 50.0, max: 90.0 };"));
        assert!(html.contains(r#"<option value="cartoon" selected>Cartoon</option>"#));
        assert!(html.contains(r#"<option class="plddt-option" value="roygb" selected>Rainbow</option>"#));
        assert!(html.contains(r#"id="bFactorMin" value="50""#));
    }

    #[test]
    fn job_name_is_escaped_in_heading() {
        let outcome = success();
        let html = RunReport::new("a&b", &outcome, StructureView::Skipped).render();
        assert!(html.contains(r#"<span class="job-name-span">a&amp;b</span>"#));
    }
}
