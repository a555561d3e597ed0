use crate::cursor::{Line, LineCursor};
use crate::error::{BvhError, Result};
use crate::kinematics;
use crate::types::*;
use crate::utils;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

static RE_JOINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(ROOT|JOINT)\s+(\S+)$").unwrap());
static RE_END_SITE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^end\s+site$").unwrap());
static RE_FRAMES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Frames:\s*(.*)$").unwrap());
static RE_FRAME_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Frame\s+Time:\s*(.*)$").unwrap());

const END_OF_INPUT: &str = "end of input";

/// Deepest joint nesting accepted, root at depth 0.
pub const MAX_DEPTH: usize = 128;

fn expect_line<'a>(cursor: &mut LineCursor<'a>, expected: &str) -> Result<Line<'a>> {
    cursor
        .next_line()
        .ok_or_else(|| BvhError::structural(0, expected, END_OF_INPUT))
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
/////////////////////////////////////////////////////////////// HIERARCHY ////////////////////////////////////////////////////////////////

/// Collects the preorder index while the tree is being built.
#[derive(Default)]
struct HierarchyBuilder {
    paths: Vec<Vec<Index>>,
    parents: Vec<Option<JointId>>,
    names: HashMap<String, JointId>,
    path: Vec<Index>,
}

impl HierarchyBuilder {
    /// Parses one node (header already consumed) and its whole subtree.
    fn read_joint(&mut self, cursor: &mut LineCursor, header: Line, parent: Option<JointId>) -> Result<Joint> {
        if self.path.len() > MAX_DEPTH {
            return Err(BvhError::structural(
                header.number,
                format!("at most {MAX_DEPTH} levels of nested joints"),
                header.text,
            ));
        }

        //// Register in preorder before any child gets an id
        let id = JointId(self.paths.len());
        self.paths.push(self.path.clone());
        self.parents.push(parent);

        let (kind, name) = read_header(header, parent.is_none())?;
        if kind != JointKind::EndSite {
            if self.names.contains_key(&name) {
                warn!(joint = %name, line = header.number, "duplicate joint name, keeping the first one for lookup");
            } else {
                self.names.insert(name.clone(), id);
            }
        }

        let line = expect_line(cursor, "`{`")?;
        if line.text != "{" {
            return Err(BvhError::structural(line.number, "`{`", line.text));
        }

        let offset = read_offset(expect_line(cursor, "OFFSET")?)?;
        let channels = if kind == JointKind::EndSite {
            Vec::new()
        } else {
            read_channels(expect_line(cursor, "CHANNELS")?)?
        };

        //// Children until the closing brace
        let mut children = Vec::new();
        loop {
            let line = expect_line(cursor, "`}` or a child joint")?;
            if line.text == "}" {
                break;
            }
            if kind == JointKind::EndSite {
                return Err(BvhError::structural(line.number, "`}` closing End Site", line.text));
            }
            self.path.push(children.len());
            let child = self.read_joint(cursor, line, Some(id))?;
            self.path.pop();
            children.push(child);
        }

        Ok(Joint {
            name,
            kind,
            offset,
            channels,
            children,
            frames: Vec::new(),
        })
    }
}

fn read_header(header: Line, is_root: bool) -> Result<(JointKind, String)> {
    if !is_root && RE_END_SITE.is_match(header.text) {
        return Ok((JointKind::EndSite, END_SITE_NAME.to_string()));
    }
    let expected = if is_root { "ROOT header" } else { "JOINT or End Site header" };
    let captures = RE_JOINT
        .captures(header.text)
        .ok_or_else(|| BvhError::structural(header.number, expected, header.text))?;
    let kind = match (&captures[1], is_root) {
        ("ROOT", true) => JointKind::Root,
        ("JOINT", false) => JointKind::Joint,
        _ => return Err(BvhError::structural(header.number, expected, header.text)),
    };
    Ok((kind, captures[2].to_string()))
}

fn read_offset(line: Line) -> Result<Position> {
    let mut tokens = line.tokens();
    if tokens.next() != Some("OFFSET") {
        return Err(BvhError::structural(line.number, "OFFSET", line.text));
    }
    let values: Vec<&str> = tokens.collect();
    if values.len() != 3 {
        return Err(BvhError::structural(line.number, "OFFSET with 3 values", line.text));
    }
    let mut offset = [0.0; 3];
    for (slot, value) in offset.iter_mut().zip(&values) {
        *slot = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BvhError::structural(line.number, "numeric OFFSET value", *value))?;
    }
    Ok(Position::from(offset))
}

fn read_channels(line: Line) -> Result<Vec<Channel>> {
    let mut tokens = line.tokens();
    if tokens.next() != Some("CHANNELS") {
        return Err(BvhError::structural(line.number, "CHANNELS", line.text));
    }
    let count = tokens.next().unwrap_or_default();
    let count: usize = count
        .parse()
        .map_err(|_| BvhError::structural(line.number, "CHANNELS count", count))?;
    let tags: Vec<&str> = tokens.collect();
    if tags.len() != count {
        return Err(BvhError::structural(
            line.number,
            format!("CHANNELS with {count} channel names"),
            line.text,
        ));
    }
    tags.into_iter()
        .map(|tag| {
            Channel::from_tag(tag)
                .ok_or_else(|| BvhError::motion(line.number, format!("unrecognized channel `{tag}`")))
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////// MOTION ///////////////////////////////////////////////////////////////////

fn motion_header<'a>(cursor: &mut LineCursor<'a>, what: &str) -> Result<Line<'a>> {
    cursor
        .next_line()
        .ok_or_else(|| BvhError::motion(0, format!("expected {what}, found {END_OF_INPUT}")))
}

/// Reads `MOTION`, `Frames:` and `Frame Time:` then distributes every frame line over the tree.
/// Returns `(frame_count, sample_interval)`.
fn read_motion(cursor: &mut LineCursor, root: &mut Joint) -> Result<(usize, f64)> {
    let line = motion_header(cursor, "MOTION")?;
    if line.text != "MOTION" {
        return Err(BvhError::motion(line.number, format!("expected MOTION, found `{}`", line.text)));
    }

    //// Parse number of frames
    let line = motion_header(cursor, "Frames:")?;
    let frame_count: usize = RE_FRAMES
        .captures(line.text)
        .and_then(|c| c[1].parse().ok())
        .ok_or_else(|| BvhError::motion(line.number, format!("expected `Frames: <count>`, found `{}`", line.text)))?;

    //// Parse frame time
    let line = motion_header(cursor, "Frame Time:")?;
    let sample_interval: f64 = RE_FRAME_TIME
        .captures(line.text)
        .and_then(|c| c[1].parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t > 0.0)
        .ok_or_else(|| {
            BvhError::motion(line.number, format!("expected `Frame Time: <seconds>`, found `{}`", line.text))
        })?;

    for frame in 0..frame_count {
        let line = cursor.next_line().ok_or_else(|| {
            BvhError::motion(0, format!("expected {frame_count} frames, input ended after {frame}"))
        })?;
        let mut tokens = line.tokens();
        read_frame(&mut tokens, root, frame as f64 * sample_interval, line)?;
        let leftover = tokens.count();
        if leftover > 0 {
            return Err(BvhError::motion(
                line.number,
                format!("frame {frame} has {leftover} values more than the hierarchy has channels"),
            ));
        }
    }

    if !cursor.is_at_end() {
        warn!(lines = cursor.remaining(), "ignoring lines after the last frame");
    }
    Ok((frame_count, sample_interval))
}

/// Depth-first, own channels before children, the order the hierarchy was declared in.
fn read_frame<'t>(
    tokens: &mut impl Iterator<Item = &'t str>,
    joint: &mut Joint,
    time: f64,
    line: Line,
) -> Result<()> {
    if joint.is_end_site() {
        return Ok(());
    }

    let mut keyframe = Keyframe::new(time);
    for &channel in &joint.channels {
        let token = tokens.next().ok_or_else(|| {
            BvhError::motion(
                line.number,
                format!("ran out of values at `{}` {}", joint.name, channel.tag()),
            )
        })?;
        let value: f64 = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                BvhError::motion(
                    line.number,
                    format!("`{token}` is not a finite number (`{}` {})", joint.name, channel.tag()),
                )
            })?;
        match channel {
            Channel::PositionX => keyframe.local_position.x = value,
            Channel::PositionY => keyframe.local_position.y = value,
            Channel::PositionZ => keyframe.local_position.z = value,
            _ => {}
        }
        if let Some(rotation) = utils::channel_rotation(channel, value) {
            keyframe.local_rotation = keyframe.local_rotation * rotation;
        }
    }
    joint.frames.push(keyframe);

    for child in joint.children.iter_mut() {
        read_frame(tokens, child, time, line)?;
    }
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////// PUBLIC ///////////////////////////////////////////////////////////////////

/// Parses HIERARCHY and MOTION without running forward kinematics.
/// The absolute fields of every keyframe still hold placeholders afterwards.
pub(crate) fn read_skeleton(text: &str) -> Result<Skeleton> {
    let mut cursor = LineCursor::new(text);

    let line = expect_line(&mut cursor, "HIERARCHY")?;
    if line.text != "HIERARCHY" {
        return Err(BvhError::structural(line.number, "HIERARCHY", line.text));
    }

    let mut builder = HierarchyBuilder::default();
    let header = expect_line(&mut cursor, "ROOT header")?;
    let mut root = builder.read_joint(&mut cursor, header, None)?;
    debug!(joints = builder.paths.len(), "parsed hierarchy");

    let (frame_count, sample_interval) = read_motion(&mut cursor, &mut root)?;
    debug!(frame_count, sample_interval, "parsed motion");

    Ok(Skeleton {
        root,
        paths: builder.paths,
        parents: builder.parents,
        names: builder.names,
        frame_count,
        sample_interval,
        solved: false,
    })
}

/// Parses a .bvh text and solves every joint's absolute transform for every frame.
pub fn parse_bvh(text: &str) -> Result<Skeleton> {
    let mut skeleton = read_skeleton(text)?;
    kinematics::solve(&mut skeleton);
    Ok(skeleton)
}
