//! Paints a prepared frame
//!
//! Read-only over the simulation: shadows first, then lit polygons far to near,
//! then sparks and the pointer trail on top.

use glam::{Vec2, Vec3};

use super::canvas::Canvas;
use super::shading::{fade_alpha, lightness};
use crate::color::colors;
use crate::sim::mesh::Face;
use crate::sim::particles::{Spark, TrailPoint};
use crate::sim::scene::Scene;
use crate::sim::state::GameState;

pub const SHADOW_STROKE_WIDTH: f32 = 2.0;
pub const SPARK_THICKNESS: f32 = 2.2;
pub const TOUCH_TRAIL_THICKNESS: f32 = 7.0;
/// Back-facing wireframe edges are drawn with this lightness
const BACK_STROKE_LIGHTNESS: f32 = 0.4;

/// Paint the current frame of `state`
pub fn paint<C: Canvas>(canvas: &mut C, state: &GameState) {
    paint_shadows(canvas, &state.scene);
    paint_polys(canvas, &state.scene);
    paint_sparks(canvas, state.sparks.live());
    paint_trail(
        canvas,
        state.trail.points().iter(),
        state.tuning.pointer.trail_life,
    );
}

/// Screen points of a face; quads at most, so no allocation
fn face_points(face: &Face, vertices: &[Vec3], out: &mut [Vec2; 4]) -> usize {
    let idx = face.indices();
    for (slot, &i) in out.iter_mut().zip(idx) {
        *slot = vertices[i as usize].truncate();
    }
    idx.len()
}

pub fn paint_shadows<C: Canvas>(canvas: &mut C, scene: &Scene) {
    let color = colors::SHADOW.with_alpha(1.0);
    let mut points = [Vec2::ZERO; 4];
    for poly in scene.shadow_polys() {
        let n = face_points(&poly.face, scene.shadow_vertices(), &mut points);
        if poly.wireframe {
            canvas.stroke_polygon(&points[..n], SHADOW_STROKE_WIDTH, color);
        } else {
            canvas.fill_polygon(&points[..n], color);
        }
    }
}

pub fn paint_polys<C: Canvas>(canvas: &mut C, scene: &Scene) {
    let mut points = [Vec2::ZERO; 4];
    for poly in scene.polys() {
        let style = &poly.style;
        let back_facing = poly.normal_camera.z < 0.0;
        if !style.wireframe && back_facing {
            continue;
        }
        let alpha = fade_alpha(poly.middle.z);
        if alpha <= 0.0 {
            continue;
        }
        let n = face_points(&poly.face, scene.vertices(), &mut points);

        if !style.wireframe {
            let fill = style.color.shade(lightness(poly.normal_world));
            canvas.fill_polygon(&points[..n], fill.with_alpha(alpha));
        }
        if style.stroke_width != 0.0 {
            let (width, color) = if back_facing {
                (
                    style.stroke_width * 0.5,
                    style.stroke_color.shade(BACK_STROKE_LIGHTNESS),
                )
            } else {
                (style.stroke_width, style.stroke_color)
            };
            canvas.stroke_polygon(&points[..n], width, color.with_alpha(alpha));
        }
    }
}

/// Sparks shrink to nothing as they die, on a root curve
pub fn paint_sparks<C: Canvas>(canvas: &mut C, sparks: &[Spark]) {
    for spark in sparks {
        let scale = spark.life_fraction().sqrt() * 1.5;
        canvas.stroke_line(
            spark.pos,
            spark.pos - spark.vel * scale,
            SPARK_THICKNESS,
            colors::SPARK,
        );
    }
}

/// Trail segments thin out with age. Nothing is drawn across a touch break.
pub fn paint_trail<'a, C, I>(canvas: &mut C, points: I, trail_life: f32)
where
    C: Canvas,
    I: IntoIterator<Item = &'a TrailPoint>,
{
    let mut prev: Option<&TrailPoint> = None;
    for current in points {
        match prev {
            Some(prev) if !prev.touch_break && !current.touch_break => {
                let width = current.life / trail_life * TOUCH_TRAIL_THICKNESS;
                canvas.stroke_line(prev.pos, current.pos, width, colors::TOUCH_TRAIL);
            }
            _ => {}
        }
        prev = Some(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::{DrawCommand, DrawList};
    use crate::sim::entity::{Entity, Role, Style, TargetColor};
    use crate::sim::mesh::Mesh;
    use std::sync::Arc;

    fn scene_with(style: Style, pos: Vec3) -> Scene {
        let mut e = Entity::new(
            Arc::new(Mesh::cube(20.0)),
            TargetColor::Orange,
            style,
            Role::Fragment,
        );
        e.kin.position = pos;
        e.transform();
        let mut scene = Scene::default();
        scene.push_entity(&e);
        scene.prepare();
        scene
    }

    #[test]
    fn test_solid_back_faces_culled() {
        let scene = scene_with(Style::Solid, Vec3::ZERO);
        let mut list = DrawList::default();
        paint_polys(&mut list, &scene);
        let visible = scene
            .polys()
            .iter()
            .filter(|p| p.normal_camera.z >= 0.0)
            .count();
        assert!(visible < 6);
        assert_eq!(list.commands().len(), visible);
        assert!(
            list.commands()
                .iter()
                .all(|c| matches!(c, DrawCommand::Fill { .. }))
        );
    }

    #[test]
    fn test_wireframe_back_edges_thin_and_dark() {
        let scene = scene_with(Style::Wireframe, Vec3::ZERO);
        let mut list = DrawList::default();
        paint_polys(&mut list, &scene);
        assert_eq!(list.commands().len(), 6);
        let widths: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePolygon { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert!(widths.contains(&1.0));
        assert!(widths.contains(&2.0));
        let dark = TargetColor::Orange.rgb().shade(0.4);
        assert!(list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::StrokePolygon { color, width, .. } if *width == 1.0 && color.rgb() == dark
        )));
    }

    #[test]
    fn test_near_camera_polys_fade() {
        let scene = scene_with(Style::Solid, Vec3::new(0.0, 0.0, 500.0));
        let mut list = DrawList::default();
        paint_polys(&mut list, &scene);
        for c in list.commands() {
            if let DrawCommand::Fill { color, .. } = c {
                assert!(color.a < 1.0 && color.a > 0.0);
            }
        }
    }

    #[test]
    fn test_shadows_fill_or_stroke() {
        let scene = scene_with(Style::Wireframe, Vec3::ZERO);
        let mut list = DrawList::default();
        paint_shadows(&mut list, &scene);
        assert_eq!(list.commands().len(), 6);
        assert!(list.commands().iter().all(|c| matches!(
            c,
            DrawCommand::StrokePolygon { width, .. } if *width == SHADOW_STROKE_WIDTH
        )));
    }

    #[test]
    fn test_spark_length_shrinks() {
        let spark = Spark {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            life: 25.0,
            max_life: 100.0,
        };
        let mut list = DrawList::default();
        paint_sparks(&mut list, &[spark]);
        assert_eq!(
            list.commands()[0],
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::new(-7.5, 0.0),
                width: SPARK_THICKNESS,
                color: colors::SPARK,
            }
        );
    }

    #[test]
    fn test_trail_skips_breaks() {
        let p = |x: f32, brk: bool| TrailPoint {
            pos: Vec2::new(x, 0.0),
            life: 60.0,
            touch_break: brk,
        };
        let points = [p(0.0, false), p(1.0, false), p(0.0, true), p(5.0, false), p(6.0, false)];
        let mut list = DrawList::default();
        paint_trail(&mut list, points.iter(), 120.0);
        assert_eq!(list.commands().len(), 2);
        assert!(matches!(list.commands()[0], DrawCommand::Line { width, .. } if width == 3.5));
    }
}
