//! Frames, text boxes, embedded images, groups and basic shapes.

use super::OdfGenerator;
use crate::odf::DocumentKind;
use crate::odf::property::{PropertyList, PropertyValue, is_reserved_key};
use crate::odf::state::{Context, ContextKind};
use phf::{Set, phf_set};

/// Keys written on the frame or shape element; everything else goes to its
/// graphic style.
static GRAPHIC_ELEMENT_KEYS: Set<&'static str> = phf_set! {
    "svg:x",
    "svg:y",
    "svg:width",
    "svg:height",
    "fo:min-width",
    "fo:min-height",
    "style:rel-width",
    "style:rel-height",
    "text:anchor-type",
    "text:anchor-page-number",
    "draw:z-index",
    "draw:name",
    "draw:layer",
    "draw:transform",
    "presentation:class",
};

const ELLIPSE_KEYS: [&str; 4] = ["svg:cx", "svg:cy", "svg:rx", "svg:ry"];

/// Scale of `svg:viewBox` and `draw:points` coordinates (1/1000 inch).
const POINT_SCALE: f64 = 1000.0;

impl OdfGenerator<'_> {
    /// Split a shape bag into element attributes and a graphic style name.
    fn graphic_attributes(&mut self, properties: &PropertyList) -> PropertyList {
        let style = properties.filtered(|key| !is_reserved_key(key) && !GRAPHIC_ELEMENT_KEYS.contains(key));
        let zone = self.zone();
        let name = self.doc.styles.add_graphic(&style, zone);

        let mut attrs = PropertyList::new().with("draw:style-name", name);
        for (key, value) in properties.iter() {
            if GRAPHIC_ELEMENT_KEYS.contains(key) {
                attrs.insert(key, value.clone());
            }
        }
        if self.kind() == DocumentKind::Text && !attrs.contains("text:anchor-type") && !self.in_context(ContextKind::Group) {
            attrs.insert("text:anchor-type", "paragraph");
        }
        attrs
    }

    /// Open a frame positioned by `svg:x`, `svg:y`, `svg:width` and
    /// `svg:height`.
    pub fn open_frame(&mut self, properties: &PropertyList) {
        if self.rejects("open_frame") {
            return;
        }
        self.frame_count += 1;
        let mut attrs = self.graphic_attributes(properties);
        if !attrs.contains("draw:name") {
            attrs.insert("draw:name", format!("Object{}", self.frame_count));
        }
        self.push_storage();
        self.storage().open_element("draw:frame", attrs);
        self.contexts
            .push(Context::closing(ContextKind::Frame, &["draw:frame"]));
    }

    pub fn close_frame(&mut self) {
        self.close_context(ContextKind::Frame);
    }

    /// Open a text box; only valid directly inside a frame.
    pub fn open_text_box(&mut self, properties: &PropertyList) {
        if self.rejects("open_text_box") {
            return;
        }
        if self.top_kind() != Some(ContextKind::Frame) {
            log::warn!("text box opened outside a frame ignored");
            self.contexts.push(Context::ignored(ContextKind::TextBox));
            return;
        }
        let attrs = properties.filtered(|key| key.starts_with("draw:chain-next-name") || key == "fo:min-height");
        self.push_storage();
        self.storage().open_element("draw:text-box", attrs);
        self.contexts
            .push(Context::closing(ContextKind::TextBox, &["draw:text-box"]));
    }

    pub fn close_text_box(&mut self) {
        self.close_context(ContextKind::TextBox);
    }

    /// Embed binary data in the current frame. The data comes from
    /// `office:binary-data` (raw bytes or base64 text) and its type from
    /// `librevenge:mime-type`.
    pub fn insert_binary_object(&mut self, properties: &PropertyList) {
        if self.rejects("insert_binary_object") {
            return;
        }
        if self.top_kind() != Some(ContextKind::Frame) {
            log::warn!("binary object outside a frame ignored");
            return;
        }
        let data = match properties.get("office:binary-data") {
            Some(value @ (PropertyValue::Binary(_) | PropertyValue::Str(_))) => value.to_string(),
            _ => {
                log::warn!("binary object without data ignored");
                return;
            },
        };

        let mut attrs = PropertyList::new();
        if let Some(mime) = properties.get_str("librevenge:mime-type") {
            attrs.insert("draw:mime-type", mime);
        }
        let storage = self.storage();
        storage.open_element("draw:image", attrs);
        storage.open("office:binary-data");
        storage.characters(data);
        storage.close_element("office:binary-data");
        if let Some(description) = properties.get_str("librevenge:replacement-text") {
            storage.open("svg:desc");
            storage.characters(description);
            storage.close_element("svg:desc");
        }
        storage.close_element("draw:image");
    }

    /// Open a group of shapes.
    pub fn open_group(&mut self, properties: &PropertyList) {
        if self.rejects("open_group") {
            return;
        }
        let attrs = properties.filtered(|key| GRAPHIC_ELEMENT_KEYS.contains(key) && key.starts_with("draw:"));
        self.storage().open_element("draw:g", attrs);
        self.contexts
            .push(Context::closing(ContextKind::Group, &["draw:g"]));
    }

    pub fn close_group(&mut self) {
        self.close_context(ContextKind::Group);
    }

    pub fn draw_rectangle(&mut self, properties: &PropertyList) {
        if self.rejects("draw_rectangle") {
            return;
        }
        let attrs = self.graphic_attributes(properties);
        self.storage().empty_element("draw:rect", attrs);
    }

    /// Draw an ellipse given by its centre (`svg:cx`, `svg:cy`) and radii
    /// (`svg:rx`, `svg:ry`).
    pub fn draw_ellipse(&mut self, properties: &PropertyList) {
        if self.rejects("draw_ellipse") {
            return;
        }
        let length = |key: &str| properties.get_inches(key).unwrap_or(0.0);
        let (cx, cy, rx, ry) = (length("svg:cx"), length("svg:cy"), length("svg:rx"), length("svg:ry"));
        let shape = properties.filtered(|key| !ELLIPSE_KEYS.contains(&key));
        let mut attrs = self.graphic_attributes(&shape);
        attrs.insert("svg:x", PropertyValue::inch(cx - rx));
        attrs.insert("svg:y", PropertyValue::inch(cy - ry));
        attrs.insert("svg:width", PropertyValue::inch(2.0 * rx));
        attrs.insert("svg:height", PropertyValue::inch(2.0 * ry));
        self.storage().empty_element("draw:ellipse", attrs);
    }

    /// Draw an open path through the `svg:points` vector.
    pub fn draw_polyline(&mut self, properties: &PropertyList) {
        if self.rejects("draw_polyline") {
            return;
        }
        self.draw_poly("draw:polyline", properties);
    }

    /// Draw a closed path through the `svg:points` vector.
    pub fn draw_polygon(&mut self, properties: &PropertyList) {
        if self.rejects("draw_polygon") {
            return;
        }
        self.draw_poly("draw:polygon", properties);
    }

    fn draw_poly(&mut self, element: &'static str, properties: &PropertyList) {
        let points: Vec<(f64, f64)> = properties
            .get_vector("svg:points")
            .map(|v| {
                v.iter()
                    .map(|p| (p.get_inches("svg:x").unwrap_or(0.0), p.get_inches("svg:y").unwrap_or(0.0)))
                    .collect()
            })
            .unwrap_or_default();
        if points.len() < 2 {
            log::warn!("{} with fewer than two points ignored", element);
            return;
        }
        let Some(bounds) = bounding_box(&points) else {
            return;
        };
        let (min_x, min_y, max_x, max_y) = bounds;
        let (width, height) = (max_x - min_x, max_y - min_y);

        let shape = properties.filtered(|key| key != "svg:points");
        let mut attrs = self.graphic_attributes(&shape);
        attrs.insert("svg:x", PropertyValue::inch(min_x));
        attrs.insert("svg:y", PropertyValue::inch(min_y));
        attrs.insert("svg:width", PropertyValue::inch(width));
        attrs.insert("svg:height", PropertyValue::inch(height));
        attrs.insert("svg:viewBox", format!("0 0 {} {}", scaled(width), scaled(height)));
        let path: Vec<String> = points
            .iter()
            .map(|&(x, y)| format!("{},{}", scaled(x - min_x), scaled(y - min_y)))
            .collect();
        attrs.insert("draw:points", path.join(" "));
        self.storage().empty_element(element, attrs);
    }
}

fn bounding_box(points: &[(f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    let (&(x, y), rest) = points.split_first()?;
    Some(rest.iter().fold((x, y, x, y), |(x0, y0, x1, y1), &(px, py)| {
        (x0.min(px), y0.min(py), x1.max(px), y1.max(py))
    }))
}

/// Length in inches to `svg:viewBox` units.
fn scaled(inches: f64) -> i64 {
    (inches * POINT_SCALE).round() as i64
}
