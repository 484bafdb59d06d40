//! Scene description loader.
//!
//! The format is line oriented with whitespace-separated fields. Blank
//! lines and lines starting with `#` are ignored. The first character of
//! the first field selects the entry type:
//!
//! - `l x y z` - point light
//! - `c x y z fov tx ty tz` - camera at (x, y, z) looking at (tx, ty, tz)
//! - `s x y z radius r g b spec_power reflectivity` - sphere
//!
//! Parsing is lenient. Numbers are read like C's `atof` (longest numeric
//! prefix, 0.0 otherwise), missing position components default to 0, and
//! a line that ends before its last required field is dropped. Input is
//! read as bytes; anything that is not valid UTF-8 is replaced rather than
//! rejected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use scanray_math::Vec3;
use thiserror::Error;

use crate::scene::{Camera, Light, Material, Scene, Sphere, MAX_LIGHTS};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Too many lights at line {line}: at most {capacity} are supported")]
    TooManyLights { line: usize, capacity: usize },
}

/// Result type for loading operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Field separators.
const DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// One parsed line of the scene description.
#[derive(Debug, PartialEq)]
enum Entry {
    Light(Vec3),
    Camera(Camera),
    Sphere(Sphere),
    Unknown(char),
}

/// Load a scene from a buffered reader.
pub fn load_scene<R: BufRead>(mut reader: R) -> SceneResult<Scene> {
    let mut scene = Scene::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(strip_line_ending(&buf));
        match parse_line(&line) {
            Some(Entry::Light(position)) => {
                scene
                    .add_light(Light::new(position))
                    .map_err(|_| SceneError::TooManyLights {
                        line: line_number,
                        capacity: MAX_LIGHTS,
                    })?;
            }
            Some(Entry::Camera(camera)) => scene.set_camera(camera),
            Some(Entry::Sphere(sphere)) => {
                if sphere.radius > 0.0 {
                    scene.add_sphere(sphere);
                } else {
                    warn!(
                        "line {}: skipping sphere with non-positive radius {}",
                        line_number, sphere.radius
                    );
                }
            }
            Some(Entry::Unknown(tag)) => warn!("line {}: unknown type: {}", line_number, tag),
            None => {}
        }
    }

    if !scene.has_camera() {
        warn!("Scene defines no camera, using a degenerate camera at the origin");
    }

    debug!(
        "Loaded scene: {} spheres, {} lights",
        scene.sphere_count(),
        scene.light_count()
    );

    Ok(scene)
}

/// Load a scene from a string.
pub fn parse_scene(content: &str) -> SceneResult<Scene> {
    load_scene(content.as_bytes())
}

/// Load a scene from a file.
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let file = File::open(path.as_ref())?;
    load_scene(BufReader::new(file))
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// Parse a single line. `None` means the line is skipped silently.
fn parse_line(line: &str) -> Option<Entry> {
    let trimmed = line.trim_start_matches(&[' ', '\t'][..]);
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let mut fields = trimmed.split(DELIMITERS).filter(|f| !f.is_empty());
    let tag = fields.next()?.chars().next()?;

    let position = read_vec3(&mut fields);
    if tag == 'l' {
        return Some(Entry::Light(position));
    }

    let radius = parse_number(fields.next()?);
    let color = read_vec3(&mut fields);
    if tag == 'c' {
        return Some(Entry::Camera(Camera::new(position, color, radius)));
    }

    let specular_power = parse_number(fields.next()?);
    let reflectivity = parse_number(fields.next()?);
    if tag == 's' {
        let material = Material::new(color, specular_power, reflectivity);
        return Some(Entry::Sphere(Sphere::new(position, radius, material)));
    }

    Some(Entry::Unknown(tag))
}

/// Read up to three components; missing ones are 0.
fn read_vec3<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Vec3 {
    let mut v = [0.0; 3];
    for slot in v.iter_mut() {
        match fields.next() {
            Some(field) => *slot = parse_number(field),
            None => break,
        }
    }
    Vec3::from_array(v)
}

/// Parse the longest numeric prefix of `field`, or 0.0 if there is none.
fn parse_number(field: &str) -> f64 {
    let len = numeric_prefix_len(field.as_bytes());
    field[..len].parse().unwrap_or(0.0)
}

/// Length of the `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "\
# spheres
s 0 -1000 2 999 0.5 0.5 0.5 80 0
s -1.5 -0.3 3 0.7 1.0 0.2 0.05 50 0.3

\t  # indented comment
l -50 100 -50
l 40 40 150
c 0 6 -17 45 0 -1 0
";

    #[test]
    fn test_load_scene() {
        let scene = parse_scene(SCENE).unwrap();

        assert_eq!(scene.sphere_count(), 2);
        assert_eq!(scene.light_count(), 2);
        assert!(scene.has_camera());

        let ground = scene.spheres()[0];
        assert_eq!(ground.center, Vec3::new(0.0, -1000.0, 2.0));
        assert_eq!(ground.radius, 999.0);
        assert_eq!(ground.material.color, Vec3::splat(0.5));
        assert_eq!(ground.material.specular_power, 80.0);
        assert_eq!(ground.material.reflectivity, 0.0);

        let camera = scene.camera();
        assert_eq!(camera.position, Vec3::new(0.0, 6.0, -17.0));
        assert_eq!(camera.target, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(camera.fov, 45.0);

        assert_eq!(scene.lights()[1].position, Vec3::new(40.0, 40.0, 150.0));
    }

    #[test]
    fn test_short_lines_are_lenient() {
        // Light with missing components, sphere missing reflectivity
        let scene = parse_scene("l 1 2\ns 0 0 0 1 1 1 1 10\nc 0 0 -5\n").unwrap();

        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.lights()[0].position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(scene.sphere_count(), 0);
        assert!(!scene.has_camera());
    }

    #[test]
    fn test_camera_without_target() {
        let scene = parse_scene("c 0 0 -5 45\n").unwrap();
        assert_eq!(scene.camera().position, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(scene.camera().target, Vec3::ZERO);
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = parse_scene("x 0 0 0 1 1 1 1 0 0\ns 0 0 0 1 1 1 1 0 0\n").unwrap();
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(parse_line("x 0 0 0 1 1 1 1 0 0"), Some(Entry::Unknown('x')));
        assert_eq!(parse_line("x 0 0"), None);
    }

    #[test]
    fn test_tag_is_first_character() {
        let scene = parse_scene("light 0 10 0\nsphere 0 0 0 2 1 1 1 0 0\n").unwrap();
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.spheres()[0].radius, 2.0);
    }

    #[test]
    fn test_non_positive_radius_is_skipped() {
        let scene = parse_scene("s 0 0 0 0 1 1 1 0 0\ns 0 0 0 -1 1 1 1 0 0\n").unwrap();
        assert_eq!(scene.sphere_count(), 0);
    }

    #[test]
    fn test_too_many_lights() {
        let content = "l 0 0 0\n".repeat(MAX_LIGHTS + 1);
        match parse_scene(&content) {
            Err(SceneError::TooManyLights { line, capacity }) => {
                assert_eq!(line, MAX_LIGHTS + 1);
                assert_eq!(capacity, MAX_LIGHTS);
            }
            other => panic!("expected TooManyLights, got {:?}", other.map(|s| s.light_count())),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let scene = parse_scene("s 0 0 0 1 1 1 1 0 0.25\r\n\r\nl 0 5 0\r\n").unwrap();
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.spheres()[0].material.reflectivity, 0.25);
        assert_eq!(scene.light_count(), 1);
    }

    #[test]
    fn test_non_utf8_bytes_are_tolerated() {
        let content: &[u8] = b"# caf\xe9 scene\ns 0 0 0 1 1 1 1 0 0.5\xe9\nl 0 10 0\n";
        let scene = load_scene(content).unwrap();

        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.spheres()[0].material.reflectivity, 0.5);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.lights()[0].position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_last_line_without_newline() {
        let scene = parse_scene("l 0 10 0\r\ns 0 0 0 1 1 1 1 0 0").unwrap();
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.sphere_count(), 1);
    }

    #[test]
    fn test_parse_number_like_atof() {
        assert_eq!(parse_number("1.5"), 1.5);
        assert_eq!(parse_number("-2"), -2.0);
        assert_eq!(parse_number("+.5"), 0.5);
        assert_eq!(parse_number("3."), 3.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("2.5E-1x"), 0.25);
        assert_eq!(parse_number("7e"), 7.0);
        assert_eq!(parse_number("4,5"), 4.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("."), 0.0);
    }
}
