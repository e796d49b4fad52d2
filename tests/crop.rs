// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use iconcrop::icontree::{Document, WriteOptions};
use iconcrop::{crop_document, Error, GeometryHost, Viewport};

fn svg(body: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
              xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
              viewBox=\"0 0 100 100\" width=\"100\" height=\"100\">{}</svg>",
        body
    )
}

fn viewport(body: &str) -> Result<Viewport, Error> {
    let mut doc = Document::parse_str(&svg(body)).unwrap();
    crop_document(&mut doc, &GeometryHost::default())
}

fn view_box(body: &str) -> String {
    viewport(body).unwrap().to_string()
}

#[test]
fn square_with_defs() {
    let cropped = iconcrop::crop(&svg(
        "<defs><rect id='big' width='90' height='90' fill='red'/></defs>\
         <rect x='10' y='10' width='20' height='20'/>",
    ))
    .unwrap();

    assert!(cropped.contains("viewBox=\"10 10 20 20\""));
    assert!(!cropped.contains("width=\"100\""));
    assert!(!cropped.contains("height=\"100\""));
    // Content is kept as is.
    assert!(cropped.contains("<rect id=\"big\" width=\"90\" height=\"90\" fill=\"red\"/>"));
}

#[test]
fn viewport_is_never_negative() {
    let vp = viewport("<path d='M 30 30 L 10 20 L 15 5'/>").unwrap();
    assert!(vp.width >= 0.0);
    assert!(vp.height >= 0.0);
    assert_eq!(vp.to_string(), "10 5 20 25");
}

#[test]
fn recrop_is_stable() {
    let body = "<g transform='rotate(30 50 50)'>\
                <path d='M 20 20 C 20 60 80 60 80 20 Z' stroke='blue' stroke-width='3'/>\
                </g>\
                <circle cx='70' cy='70' r='12.345'/>";

    let first = iconcrop::crop(&svg(body)).unwrap();
    let second = iconcrop::crop(&first).unwrap();

    let mut doc1 = Document::parse_str(&first).unwrap();
    let mut doc2 = Document::parse_str(&second).unwrap();
    let host = GeometryHost::default();
    let vp1 = crop_document(&mut doc1, &host).unwrap();
    let vp2 = crop_document(&mut doc2, &host).unwrap();

    assert!((vp1.left - vp2.left).abs() <= 0.01);
    assert!((vp1.top - vp2.top).abs() <= 0.01);
    assert!((vp1.width - vp2.width).abs() <= 0.01);
    assert!((vp1.height - vp2.height).abs() <= 0.01);
}

#[test]
fn recrop_escaped_markup() {
    let body = "<title>Arrows &amp; Shapes</title>\
                <style><![CDATA[ .a > .b, rect { stroke: none } ]]></style>\
                <a href='page?a=1&amp;b=2'><rect x='10' y='10' width='20' height='20'/></a>";

    let first = iconcrop::crop(&svg(body)).unwrap();
    assert!(first.contains("<title>Arrows &amp; Shapes</title>"));
    assert!(first.contains("href=\"page?a=1&amp;b=2\""));
    assert!(first.contains(".a &gt; .b"));
    assert!(first.contains("viewBox=\"10 10 20 20\""));

    let second = iconcrop::crop(&first).unwrap();
    assert!(second.contains("viewBox=\"10 10 20 20\""));
}

#[test]
fn stroke_inflation() {
    assert_eq!(
        view_box("<path d='M 10 10 L 30 30' fill='none' stroke='black' stroke-width='4'/>"),
        "8 8 24 24"
    );
}

#[test]
fn stroked_line() {
    assert_eq!(
        view_box("<line x1='0' y1='5' x2='10' y2='5' stroke='black' stroke-width='2'/>"),
        "-1 4 12 2"
    );
}

#[test]
fn no_negative_zero() {
    let vb = view_box("<rect x='-0.001' y='-0.004' width='10' height='10'/>");
    assert_eq!(vb, "0 0 10 10");
    assert!(!vb.contains("-0"));

    let vb = view_box("<rect x='-0.004' y='-10' width='0.003' height='10.001'/>");
    assert_eq!(vb, "0 -10 0 10");
}

#[test]
fn lone_defs() {
    let text = svg("<defs><rect width='10' height='10' fill='black'/></defs>");
    let mut doc = Document::parse_str(&text).unwrap();
    let before = doc.to_string(&WriteOptions::default());

    let res = crop_document(&mut doc, &GeometryHost::default());
    assert!(matches!(res, Err(Error::EmptyVisibleSet)));
    assert_eq!(doc.to_string(&WriteOptions::default()), before);
}

#[test]
fn lone_white_rect() {
    let text = svg("<rect width='100' height='100' fill='#fff'/>");
    let mut doc = Document::parse_str(&text).unwrap();
    let before = doc.to_string(&WriteOptions::default());

    let res = crop_document(&mut doc, &GeometryHost::default());
    assert!(matches!(res, Err(Error::EmptyVisibleSet)));
    assert_eq!(doc.to_string(&WriteOptions::default()), before);
    assert!(before.contains("viewBox=\"0 0 100 100\""));
}

#[test]
fn empty_document() {
    assert!(matches!(viewport(""), Err(Error::EmptyVisibleSet)));
}

#[test]
fn white_background_is_ignored() {
    assert_eq!(
        view_box("<rect width='100' height='100' fill='white'/><circle cx='50' cy='50' r='10'/>"),
        "40 40 20 20"
    );
}

#[test]
fn stroked_white_rect_is_visible() {
    assert_eq!(
        view_box("<rect x='10' y='10' width='10' height='10' fill='white' stroke='black'/>"),
        "9.5 9.5 11 11"
    );
}

#[test]
fn transparent_shapes() {
    assert_eq!(
        view_box("<circle cx='50' cy='50' r='50' fill='none'/><rect x='1' y='2' width='3' height='4'/>"),
        "1 2 3 4"
    );
}

#[test]
fn masked_children() {
    assert_eq!(
        view_box(
            "<mask id='m'><rect width='100' height='100' fill='white'/></mask>\
             <g mask='url(#m)'><rect width='100' height='100' fill='red'/></g>\
             <rect x='10' y='10' width='5' height='5'/>"
        ),
        "10 10 5 5"
    );
}

#[test]
fn hidden_elements() {
    assert_eq!(
        view_box(
            "<rect width='100' height='100' fill='red' display='none'/>\
             <g style='display:none'><circle cx='0' cy='0' r='40'/></g>\
             <symbol><circle cx='0' cy='0' r='40'/></symbol>\
             <rect x='10' y='10' width='5' height='5'/>"
        ),
        "10 10 5 5"
    );
}

#[test]
fn text_is_not_measured() {
    assert_eq!(
        view_box("<text x='0' y='90'>Label</text><rect x='10' y='10' width='5' height='5'/>"),
        "10 10 5 5"
    );
}

#[test]
fn style_sheet() {
    assert_eq!(
        view_box(
            "<style>.bg { fill: none } #frame { stroke: black; stroke-width: 2 }</style>\
             <circle class='bg' cx='50' cy='50' r='50'/>\
             <rect id='frame' x='10' y='10' width='10' height='10' fill='none'/>"
        ),
        "9 9 12 12"
    );
}

#[test]
fn style_attribute_wins() {
    assert_eq!(
        view_box(
            "<circle cx='50' cy='50' r='50' fill='red' style='fill:none'/>\
             <rect x='1' y='2' width='3' height='4'/>"
        ),
        "1 2 3 4"
    );
}

#[test]
fn inherited_stroke() {
    assert_eq!(
        view_box(
            "<g fill='none' stroke='currentColor' stroke-width='4' color='red'>\
             <rect x='10' y='10' width='10' height='10'/>\
             </g>"
        ),
        "8 8 14 14"
    );
}

#[test]
fn group_transform() {
    assert_eq!(
        view_box("<g transform='translate(10 20)'><rect width='5' height='5'/></g>"),
        "10 20 5 5"
    );

    assert_eq!(
        view_box("<g transform='scale(2)'><rect x='1' y='1' width='2' height='2'/></g>"),
        "2 2 4 4"
    );
}

#[test]
fn element_transform() {
    assert_eq!(
        view_box("<rect width='10' height='10' transform='rotate(90)'/>"),
        "-10 0 10 10"
    );
}

#[test]
fn use_element() {
    assert_eq!(
        view_box(
            "<defs><rect id='r' width='4' height='4'/></defs>\
             <use xlink:href='#r' x='20' y='2'/>"
        ),
        "20 2 4 4"
    );
}

#[test]
fn curve_tight_bounds() {
    assert_eq!(view_box("<path d='M 0 0 C 0 10 10 10 10 0'/>"), "0 0 10 7.5");
}

#[test]
fn rounding() {
    assert_eq!(
        view_box("<rect x='0.123' y='0.456' width='1.111' height='2.222'/>"),
        "0.12 0.46 1.11 2.22"
    );
}

#[test]
fn malformed_document() {
    assert!(matches!(iconcrop::crop("<svg"), Err(Error::MalformedDocument(_))));
    assert!(matches!(iconcrop::crop("<html/>"), Err(Error::MalformedDocument(_))));
}
