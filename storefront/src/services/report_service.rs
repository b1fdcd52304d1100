// storefront/src/services/report_service.rs

//! Product PDF report: fixed text lines on US-letter pages with a manually
//! tracked vertical cursor.

use crate::errors::{AppError, Result};
use crate::models::Product;
use crate::services::catalog_service::format_price;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use tracing::{info, instrument};

// All layout values are PostScript points (1/72 in), origin bottom-left.
pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const LEFT_MARGIN_PT: f32 = 50.0;
pub const TOP_Y_PT: f32 = 750.0;
pub const BOTTOM_MARGIN_PT: f32 = 50.0;
pub const LINE_HEIGHT_PT: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
  pub x: f32,
  pub y: f32,
  pub size: f32,
  pub bold: bool,
  pub text: String,
}

/// Lines grouped per page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
  pub pages: Vec<Vec<TextLine>>,
}

pub fn product_line(product: &Product) -> String {
  format!(
    "{} | Price: {} | Stock: {} | Active: {}",
    product.name,
    format_price(product.price),
    product.stock,
    if product.is_active { "Yes" } else { "No" }
  )
}

/// Title, blank line, then one line per product. A new page starts whenever
/// the cursor would drop below the bottom margin.
pub fn layout_products(products: &[Product]) -> ReportLayout {
  let mut pages = vec![Vec::new()];
  let mut y = TOP_Y_PT;

  pages[0].push(TextLine { x: LEFT_MARGIN_PT, y, size: TITLE_SIZE, bold: true, text: "Product Report".to_string() });
  y -= LINE_HEIGHT_PT * 2.0;

  if products.is_empty() {
    pages[0].push(TextLine { x: LEFT_MARGIN_PT, y, size: BODY_SIZE, bold: false, text: "No products.".to_string() });
  }

  for product in products {
    if y < BOTTOM_MARGIN_PT {
      pages.push(Vec::new());
      y = TOP_Y_PT;
    }
    if let Some(page) = pages.last_mut() {
      page.push(TextLine { x: LEFT_MARGIN_PT, y, size: BODY_SIZE, bold: false, text: product_line(product) });
    }
    y -= LINE_HEIGHT_PT;
  }

  ReportLayout { pages }
}

fn mm(points: f32) -> Mm {
  Mm(points * 25.4 / 72.0)
}

fn pdf_error(e: printpdf::Error) -> AppError {
  AppError::Internal(format!("PDF generation failed: {:?}", e))
}

#[instrument(name = "report_service::render_products_pdf", skip(products), fields(products = products.len()))]
pub fn render_products_pdf(products: &[Product]) -> Result<Vec<u8>> {
  let layout = layout_products(products);
  let (doc, first_page, first_layer) =
    PdfDocument::new("Product Report", mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
  let regular: IndirectFontRef = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
  let bold: IndirectFontRef = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

  for (index, lines) in layout.pages.iter().enumerate() {
    let (page, layer) = if index == 0 {
      (first_page, first_layer)
    } else {
      doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1")
    };
    let canvas = doc.get_page(page).get_layer(layer);
    for line in lines {
      let font = if line.bold { &bold } else { &regular };
      canvas.use_text(line.text.as_str(), line.size, mm(line.x), mm(line.y), font);
    }
  }

  let bytes = doc.save_to_bytes().map_err(pdf_error)?;
  info!(pages = layout.pages.len(), bytes = bytes.len(), "Rendered product report.");
  Ok(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use rust_decimal::Decimal;

  fn product(id: i64) -> Product {
    Product {
      id,
      name: format!("Product {}", id),
      description: String::new(),
      price: Decimal::new(250, 2),
      stock: 4,
      is_active: id % 2 == 0,
      image: None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn product_line_format() {
    assert_eq!(product_line(&product(2)), "Product 2 | Price: 2.50 | Stock: 4 | Active: Yes");
    assert_eq!(product_line(&product(3)), "Product 3 | Price: 2.50 | Stock: 4 | Active: No");
  }

  #[test]
  fn short_lists_fit_on_one_page() {
    let layout = layout_products(&(1..=5).map(product).collect::<Vec<_>>());
    assert_eq!(layout.pages.len(), 1);
    assert_eq!(layout.pages[0].len(), 6);
    assert_eq!(layout.pages[0][1].y, TOP_Y_PT - 2.0 * LINE_HEIGHT_PT);
  }

  #[test]
  fn long_lists_paginate_and_reset_cursor() {
    // First page holds lines at y = 710, 690, ..., 50 -> 34 products.
    let layout = layout_products(&(1..=40).map(product).collect::<Vec<_>>());
    assert_eq!(layout.pages.len(), 2);
    assert_eq!(layout.pages[0].len(), 1 + 34);
    assert_eq!(layout.pages[1].len(), 6);
    assert_eq!(layout.pages[1][0].y, TOP_Y_PT);
    assert!(layout.pages.iter().flatten().all(|l| l.y >= BOTTOM_MARGIN_PT));
  }

  #[test]
  fn rendered_bytes_are_a_pdf() {
    let bytes = render_products_pdf(&(1..=3).map(product).collect::<Vec<_>>()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
  }
}
