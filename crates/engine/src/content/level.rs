use std::collections::HashSet;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::info;

use crate::sim::{
    Block, Body, BodyTuning, CameraSettings, Rect, Simulation, Vec2, Viewport, Zone, ZoneTarget,
};

use super::color::parse_color;
use super::types::{LevelErrorCode, LevelLoadError, SourceLocation};

const SCROLLING_SPAWN_Y: f32 = 250.0;

/// Static layout of one level as authored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub blocks: Vec<Block>,
    pub zones: Vec<Zone>,
    pub camera: Option<CameraSettings>,
    pub spawn: Option<Vec2>,
}

impl LevelLayout {
    /// Builds the runtime context. Levels with a camera run the scrolling variant and,
    /// without an explicit spawn, start the body horizontally centered.
    pub fn into_simulation(self, tuning: BodyTuning, viewport: Viewport) -> Simulation {
        let spawn = self.spawn.unwrap_or_else(|| match self.camera {
            Some(_) => Vec2 {
                x: viewport.width_px() * 0.5 - tuning.width * 0.5,
                y: SCROLLING_SPAWN_Y,
            },
            None => Vec2::default(),
        });
        let simulation = Simulation::new(Body::new(spawn, tuning), viewport)
            .with_blocks(self.blocks)
            .with_zones(self.zones);
        match self.camera {
            Some(settings) => simulation.with_camera(settings),
            None => simulation,
        }
    }
}

pub fn load_level_file(path: &Path) -> Result<LevelLayout, LevelLoadError> {
    let raw = fs::read_to_string(path).map_err(|error| LevelLoadError {
        code: LevelErrorCode::ReadFile,
        message: format!("failed to read level: {error}"),
        file_path: path.to_path_buf(),
        location: None,
    })?;
    let layout = parse_level_document(path, &raw)?;
    info!(
        path = %path.display(),
        blocks = layout.blocks.len(),
        zones = layout.zones.len(),
        scrolling = layout.camera.is_some(),
        "level_parsed"
    );
    Ok(layout)
}

pub fn parse_level_document(file_path: &Path, raw: &str) -> Result<LevelLayout, LevelLoadError> {
    let doc = Document::parse(raw).map_err(|error| LevelLoadError {
        code: LevelErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;
    let ctx = ParseContext {
        file_path,
        doc: &doc,
    };

    let root = doc.root_element();
    if root.tag_name().name() != "Level" {
        return Err(ctx.error_at(
            LevelErrorCode::InvalidRoot,
            "root element must be <Level>".to_string(),
            root,
        ));
    }
    ctx.reject_unknown_attributes(root, &[])?;

    let mut layout = LevelLayout {
        blocks: Vec::new(),
        zones: Vec::new(),
        camera: None,
        spawn: None,
    };
    let mut seen_singletons = HashSet::<&str>::new();

    for child in root.children().filter(|node| node.is_element()) {
        let name = child.tag_name().name();
        if matches!(name, "Camera" | "Spawn") && !seen_singletons.insert(name) {
            return Err(ctx.error_at(
                LevelErrorCode::DuplicateElement,
                format!("<{name}> may appear at most once in <Level>"),
                child,
            ));
        }
        match name {
            "Block" => layout.blocks.push(ctx.parse_block(child)?),
            "Link" => layout.zones.push(ctx.parse_link(child)?),
            "Camera" => layout.camera = Some(ctx.parse_camera(child)?),
            "Spawn" => layout.spawn = Some(ctx.parse_spawn(child)?),
            _ => {
                return Err(ctx.error_at(
                    LevelErrorCode::UnknownElement,
                    format!(
                        "unsupported element <{name}>; allowed: <Block>, <Link>, <Camera>, <Spawn>"
                    ),
                    child,
                ))
            }
        }
    }

    Ok(layout)
}

struct ParseContext<'a, 'input> {
    file_path: &'a Path,
    doc: &'a Document<'input>,
}

impl<'a, 'input> ParseContext<'a, 'input> {
    fn parse_block(&self, node: Node<'_, '_>) -> Result<Block, LevelLoadError> {
        self.reject_unknown_attributes(node, &["x", "y", "width", "height", "color"])?;
        let rect = self.parse_rect(node)?;
        let color = self.optional_color(node)?;
        Ok(Block::new(rect).with_color(color))
    }

    fn parse_link(&self, node: Node<'_, '_>) -> Result<Zone, LevelLoadError> {
        self.reject_unknown_attributes(node, &["href", "x", "y", "width", "height", "color"])?;
        let href = self.required_attribute(node, "href")?;
        let rect = self.parse_rect(node)?;
        let color = self.optional_color(node)?;
        Ok(Zone::new(rect, ZoneTarget(href.to_string())).with_color(color))
    }

    fn parse_camera(&self, node: Node<'_, '_>) -> Result<CameraSettings, LevelLoadError> {
        self.reject_unknown_attributes(
            node,
            &["minOffset", "maxOffset", "rightThreshold", "leftThreshold"],
        )?;
        let defaults = CameraSettings::default();
        Ok(CameraSettings {
            right_threshold: self
                .optional_number(node, "rightThreshold")?
                .unwrap_or(defaults.right_threshold),
            left_threshold: self
                .optional_number(node, "leftThreshold")?
                .unwrap_or(defaults.left_threshold),
            min_offset: self
                .optional_number(node, "minOffset")?
                .unwrap_or(defaults.min_offset),
            max_offset: self.optional_number(node, "maxOffset")?,
        })
    }

    fn parse_spawn(&self, node: Node<'_, '_>) -> Result<Vec2, LevelLoadError> {
        self.reject_unknown_attributes(node, &["x", "y"])?;
        Ok(Vec2 {
            x: self.required_number(node, "x")?,
            y: self.required_number(node, "y")?,
        })
    }

    fn parse_rect(&self, node: Node<'_, '_>) -> Result<Rect, LevelLoadError> {
        Ok(Rect::new(
            self.required_number(node, "x")?,
            self.required_number(node, "y")?,
            self.required_number(node, "width")?,
            self.required_number(node, "height")?,
        ))
    }

    fn required_attribute<'n>(
        &self,
        node: Node<'n, '_>,
        name: &str,
    ) -> Result<&'n str, LevelLoadError> {
        match node.attribute(name).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.error_at(
                LevelErrorCode::MissingAttribute,
                format!(
                    "missing required attribute '{name}' on <{}>",
                    node.tag_name().name()
                ),
                node,
            )),
        }
    }

    fn required_number(&self, node: Node<'_, '_>, name: &str) -> Result<f32, LevelLoadError> {
        let raw = self.required_attribute(node, name)?;
        self.parse_number(node, name, raw)
    }

    fn optional_number(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<f32>, LevelLoadError> {
        node.attribute(name)
            .map(|raw| self.parse_number(node, name, raw.trim()))
            .transpose()
    }

    fn parse_number(
        &self,
        node: Node<'_, '_>,
        name: &str,
        raw: &str,
    ) -> Result<f32, LevelLoadError> {
        match raw.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.error_at(
                LevelErrorCode::InvalidValue,
                format!("attribute '{name}' value '{raw}' is not a finite number"),
                node,
            )),
        }
    }

    fn optional_color(&self, node: Node<'_, '_>) -> Result<Option<[u8; 4]>, LevelLoadError> {
        let Some(raw) = node.attribute("color") else {
            return Ok(None);
        };
        parse_color(raw).map(Some).ok_or_else(|| {
            self.error_at(
                LevelErrorCode::InvalidValue,
                format!("invalid color '{raw}'; expected #rrggbb or a basic color name"),
                node,
            )
        })
    }

    fn reject_unknown_attributes(
        &self,
        node: Node<'_, '_>,
        allowed: &[&str],
    ) -> Result<(), LevelLoadError> {
        for attribute in node.attributes() {
            if !allowed.contains(&attribute.name()) {
                return Err(self.error_at(
                    LevelErrorCode::UnknownAttribute,
                    format!(
                        "unknown attribute '{}' on <{}>",
                        attribute.name(),
                        node.tag_name().name()
                    ),
                    node,
                ));
            }
        }
        Ok(())
    }

    fn error_at(
        &self,
        code: LevelErrorCode,
        message: String,
        node: Node<'_, '_>,
    ) -> LevelLoadError {
        let pos = self.doc.text_pos_at(node.range().start);
        LevelLoadError {
            code,
            message,
            file_path: self.file_path.to_path_buf(),
            location: Some(SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1200,
        height: 700,
    };

    fn parse(raw: &str) -> Result<LevelLayout, LevelLoadError> {
        parse_level_document(&PathBuf::from("test.xml"), raw)
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    #[test]
    fn blocks_and_links_keep_declaration_order() {
        let layout = parse(
            r##"<Level>
                <Block x="500" y="500" width="500" height="200"/>
                <Link href="level:cave.xml" x="10" y="20" width="30" height="40" color="#ff0000"/>
                <Block x="0" y="0" width="1" height="2" color="gray"/>
                <Link href="https://example.com" x="1" y="2" width="3" height="4"/>
            </Level>"##,
        )
        .expect("parse");

        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(
            layout.blocks[0].placement.world(),
            Rect::new(500.0, 500.0, 500.0, 200.0)
        );
        assert_eq!(layout.blocks[0].color, None);
        assert_eq!(layout.blocks[1].color, Some([128, 128, 128, 255]));
        assert_eq!(layout.zones.len(), 2);
        assert_eq!(layout.zones[0].target.as_str(), "level:cave.xml");
        assert_eq!(layout.zones[0].color, Some([255, 0, 0, 255]));
        assert_eq!(layout.zones[1].target.as_str(), "https://example.com");
        assert!(layout.camera.is_none());
        assert!(layout.spawn.is_none());
    }

    #[test]
    fn camera_attributes_fall_back_to_defaults() {
        let layout = parse(r#"<Level><Camera maxOffset="4000"/></Level>"#).expect("parse");

        let camera = layout.camera.expect("camera");
        assert_eq!(camera.max_offset, Some(4000.0));
        assert_eq!(camera.min_offset, 0.0);
        assert_eq!(camera.right_threshold, 0.8);
        assert_eq!(camera.left_threshold, 0.2);
    }

    #[test]
    fn fixed_screen_level_spawns_at_origin() {
        let layout = parse("<Level/>").expect("parse");
        let sim = layout.into_simulation(BodyTuning::default(), VIEWPORT);

        assert_eq!(sim.body().position, Vec2::default());
        assert!(sim.camera().is_none());
    }

    #[test]
    fn scrolling_level_spawns_centered() {
        let layout = parse("<Level><Camera/></Level>").expect("parse");
        let sim = layout.into_simulation(BodyTuning::default(), VIEWPORT);

        assert_eq!(sim.body().position, Vec2 { x: 575.0, y: 250.0 });
        assert_eq!(sim.camera().expect("camera").max_offset(), 1200.0);
    }

    #[test]
    fn explicit_spawn_wins() {
        let layout = parse(r#"<Level><Camera/><Spawn x="12" y="34"/></Level>"#).expect("parse");
        let sim = layout.into_simulation(BodyTuning::default(), VIEWPORT);

        assert_eq!(sim.body().position, Vec2 { x: 12.0, y: 34.0 });
    }

    #[test]
    fn missing_attribute_reports_location() {
        let err = parse("<Level>\n  <Block x=\"1\" y=\"2\" width=\"3\"/>\n</Level>")
            .expect_err("error");

        assert_eq!(err.code, LevelErrorCode::MissingAttribute);
        assert!(err.message.contains("height"));
        let location = err.location.expect("location");
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 3);
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = parse(r#"<Level><Block x="left" y="2" width="3" height="4"/></Level>"#)
            .expect_err("error");
        assert_eq!(err.code, LevelErrorCode::InvalidValue);

        let err = parse(r#"<Level><Block x="inf" y="2" width="3" height="4"/></Level>"#)
            .expect_err("error");
        assert_eq!(err.code, LevelErrorCode::InvalidValue);
    }

    #[test]
    fn unknown_elements_and_attributes_error() {
        let err = parse("<Level><Enemy/></Level>").expect_err("error");
        assert_eq!(err.code, LevelErrorCode::UnknownElement);

        let err = parse(r#"<Level><Spawn x="1" y="2" z="3"/></Level>"#).expect_err("error");
        assert_eq!(err.code, LevelErrorCode::UnknownAttribute);
    }

    #[test]
    fn duplicate_camera_errors() {
        let err = parse("<Level><Camera/><Camera/></Level>").expect_err("error");
        assert_eq!(err.code, LevelErrorCode::DuplicateElement);
    }

    #[test]
    fn wrong_root_and_malformed_xml_error() {
        let err = parse("<Defs/>").expect_err("error");
        assert_eq!(err.code, LevelErrorCode::InvalidRoot);

        let err = parse("<Level><Block></Level>").expect_err("error");
        assert_eq!(err.code, LevelErrorCode::XmlMalformed);
        assert!(err.location.is_some());
    }

    #[test]
    fn link_without_href_errors() {
        let err = parse(r#"<Level><Link x="1" y="2" width="3" height="4"/></Level>"#)
            .expect_err("error");
        assert_eq!(err.code, LevelErrorCode::MissingAttribute);
    }

    #[test]
    fn load_level_file_reads_from_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("levels").join("start.xml");
        write_file(
            &path,
            r#"<Level><Block x="0" y="650" width="1200" height="50"/></Level>"#,
        );

        let layout = load_level_file(&path).expect("load");
        assert_eq!(layout.blocks.len(), 1);
    }

    #[test]
    fn missing_file_reports_read_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_level_file(&temp.path().join("nope.xml")).expect_err("error");

        assert_eq!(err.code, LevelErrorCode::ReadFile);
        assert!(err.location.is_none());
    }
}
