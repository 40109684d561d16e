//! Figure generation using plotters (SVG output)
//!
//! Figures are rendered into in-memory SVG strings so they can be both inlined
//! into a report and written next to it.

use crate::core::models::confidence::ChainConfidence;
use crate::core::utils::color::Rgb;
use crate::engine::error::EngineError;
use ndarray::Array2;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

/// Largest number of heatmap cells drawn per axis; bigger matrices are binned.
pub const MAX_HEATMAP_CELLS: usize = 150;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn figure_error(figure: String) -> impl FnOnce(Box<dyn std::error::Error>) -> EngineError {
    move |e| EngineError::Figure {
        figure,
        message: e.to_string(),
    }
}

/// Line chart of per-residue pLDDT (0-100) for one chain.
pub fn plddt_chart(chain: &ChainConfidence) -> Result<String, EngineError> {
    let mut svg = String::new();
    draw_plddt(&mut svg, chain)
        .map_err(figure_error(format!("pLDDT chain {}", chain.chain_id)))?;
    Ok(svg)
}

fn draw_plddt(svg: &mut String, chain: &ChainConfidence) -> DrawResult {
    let root = SVGBackend::with_string(svg, (800, 320)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = chain.plddt.len().saturating_sub(1).max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("pLDDT for Chain {}", chain.chain_id),
            ("sans-serif", 20),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(format!("Residue Index (Chain {})", chain.chain_id))
        .y_desc("pLDDT Score")
        .draw()?;

    let color = rgb(chain.style.line);
    let points: Vec<(f64, f64)> = chain
        .plddt
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    chart.draw_series(AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.2)))?;
    chart.draw_series(LineSeries::new(points, &color))?;

    root.present()?;
    Ok(())
}

/// Heatmap of the chain's symmetrized PAE block, dark for low error.
pub fn pae_heatmap(chain: &ChainConfidence) -> Result<String, EngineError> {
    let mut svg = String::new();
    draw_pae(&mut svg, chain).map_err(figure_error(format!("PAE chain {}", chain.chain_id)))?;
    Ok(svg)
}

fn draw_pae(svg: &mut String, chain: &ChainConfidence) -> DrawResult {
    let root = SVGBackend::with_string(svg, (480, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chain.pae.nrows().max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("PAE for Chain {}", chain.chain_id),
            ("sans-serif", 20),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n, 0f64..n)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(format!("Residue (Chain {})", chain.chain_id))
        .y_desc(format!("Residue (Chain {})", chain.chain_id))
        .draw()?;

    let (lo, hi) = value_range(&chain.pae);
    let low = chain.style.gradient_low;
    let high = chain.style.gradient_high;
    let cells = binned_cells(&chain.pae, MAX_HEATMAP_CELLS);

    chart.draw_series(cells.into_iter().map(|cell| {
        let t = if hi > lo { (cell.value - lo) / (hi - lo) } else { 0.0 };
        Rectangle::new(
            [(cell.x.0, cell.y.0), (cell.x.1, cell.y.1)],
            rgb(low.lerp(high, t)).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    x: (f64, f64),
    y: (f64, f64),
    value: f64,
}

fn value_range(matrix: &Array2<f64>) -> (f64, f64) {
    matrix
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

fn bin_edges(n: usize, bins: usize) -> Vec<usize> {
    (0..=bins).map(|b| b * n / bins).collect()
}

/// Averages the matrix into at most `max_bins` x `max_bins` cells. Row `i`
/// maps to the `y` axis so the origin sits bottom-left.
fn binned_cells(matrix: &Array2<f64>, max_bins: usize) -> Vec<Cell> {
    let n = matrix.nrows().min(matrix.ncols());
    if n == 0 {
        return Vec::new();
    }
    let bins = n.min(max_bins.max(1));
    let edges = bin_edges(n, bins);

    let mut cells = Vec::with_capacity(bins * bins);
    for rows in edges.windows(2) {
        for cols in edges.windows(2) {
            let block = matrix.slice(ndarray::s![rows[0]..rows[1], cols[0]..cols[1]]);
            let value = block.mean().unwrap_or(0.0);
            cells.push(Cell {
                x: (cols[0] as f64, cols[1] as f64),
                y: (rows[0] as f64, rows[1] as f64),
                value,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::confidence::{ChainStats, ChainStyle};
    use ndarray::array;

    fn chain(plddt: Vec<f64>, pae: Array2<f64>) -> ChainConfidence {
        let stats = ChainStats::from_scores(&plddt).unwrap();
        ChainConfidence {
            chain_id: "A".to_string(),
            style: ChainStyle::for_position(0),
            plddt,
            pae,
            stats,
        }
    }

    #[test]
    fn small_matrix_keeps_one_cell_per_entry() {
        let cells = binned_cells(&array![[0.0, 1.0], [2.0, 3.0]], 150);
        assert_eq!(cells.len(), 4);
        assert_eq!(
            cells[1],
            Cell {
                x: (1.0, 2.0),
                y: (0.0, 1.0),
                value: 1.0
            }
        );
    }

    #[test]
    fn large_matrix_is_binned_by_averaging() {
        let matrix = Array2::from_shape_fn((4, 4), |(i, j)| (i / 2 * 10 + j / 2) as f64);
        let cells = binned_cells(&matrix, 2);
        let values: Vec<f64> = cells.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![0.0, 1.0, 10.0, 11.0]);
        assert_eq!(cells[3].x, (2.0, 4.0));
    }

    #[test]
    fn plddt_chart_is_an_svg_with_caption() {
        let svg = plddt_chart(&chain(vec![50.0, 80.0, 95.0], Array2::zeros((3, 3)))).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("pLDDT for Chain A"));
    }

    #[test]
    fn pae_heatmap_handles_single_residue_chain() {
        let svg = pae_heatmap(&chain(vec![70.0], array![[0.5]])).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("PAE for Chain A"));
    }
}
