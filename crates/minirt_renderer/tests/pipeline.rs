//! Whole-frame rendering checks: shading values, depth ordering, shadows and
//! the screen-space bounds.

use minirt_core::shapes::demo_scene;
use minirt_core::SceneConfig;
use minirt_renderer::{
    unpack_rgba, Camera, IndexBuffer, Light, Ray, RenderPipeline, Triangle, Vec3, Vec4, Vertex,
    VertexBuffer, EPSILON, HUGE,
};

const SIZE: u32 = 32;
const CENTER: u32 = 16;

fn facing(points: [Vec3; 3], color: Vec4) -> [Vertex; 3] {
    points.map(|p| Vertex::new(p, Vec3::NEG_Z, color, Default::default()))
}

fn buffers(triangles: &[[Vertex; 3]]) -> (VertexBuffer, IndexBuffer) {
    let vertices: Vec<Vertex> = triangles.iter().flatten().copied().collect();
    let indices: Vec<i32> = (0..vertices.len() as i32).collect();
    (
        VertexBuffer::from_vertices(&vertices).unwrap(),
        IndexBuffer::new(&indices).unwrap(),
    )
}

/// Render one frame of `first..=last` with the default camera.
fn render<'a>(
    vb: &'a VertexBuffer,
    ib: &'a IndexBuffer,
    lights: &[Light],
    ranges: &[(usize, usize)],
) -> RenderPipeline<'a> {
    let mut pipeline = RenderPipeline::new(SIZE, SIZE, 16).unwrap();
    pipeline.set_vertex_buffer(vb).unwrap();
    pipeline.set_index_buffer(ib).unwrap();
    for light in lights {
        pipeline.add_light(*light).unwrap();
    }
    pipeline.begin().unwrap();
    pipeline.clear_buffer().unwrap();
    for &(first, last) in ranges {
        pipeline.draw_indexed_triangles(first, last).unwrap();
    }
    pipeline
}

fn center_rgb(pipeline: &RenderPipeline) -> [u8; 3] {
    let [r, g, b, a] = unpack_rgba(pipeline.color_at(CENTER, CENTER).unwrap());
    assert_eq!(a, 255);
    [r, g, b]
}

fn assert_near(actual: [u8; 3], expected: [u8; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((*a as i32 - e as i32).abs() <= 1, "{actual:?} != {expected:?}");
    }
}

fn front_triangle(z: f32, color: Vec4) -> [Vertex; 3] {
    facing(
        [
            Vec3::new(-z / 2.0, -z / 2.0, z),
            Vec3::new(0.0, z / 2.0, z),
            Vec3::new(z / 2.0, -z / 2.0, z),
        ],
        color,
    )
}

#[test]
fn diffuse_lit_center_pixel() {
    let (vb, ib) = buffers(&[front_triangle(2.0, Vec4::ONE)]);
    let pipeline = render(&vb, &ib, &[Light::at(Vec3::new(0.0, 3.0, -1.0))], &[(0, 0)]);

    // n . l = cos 45deg: (0.2 + 0.5 * 0.7071) * 256
    assert_near(center_rgb(&pipeline), [141, 141, 141]);
    assert!((pipeline.depth_at(CENTER, CENTER).unwrap() - 2.0).abs() < 1e-4);

    // A corner pixel misses and keeps the ambient background
    let [r, g, b, _] = unpack_rgba(pipeline.color_at(0, 0).unwrap());
    assert_eq!([r, g, b], [51, 51, 51]);
    assert_eq!(pipeline.depth_at(0, 0), Some(HUGE));
}

#[test]
fn specular_added_unmodulated() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let (vb, ib) = buffers(&[front_triangle(2.0, red)]);
    let light = Light::new(
        Vec3::new(0.0, 0.0, -5.0),
        Vec4::new(0.5, 0.5, 0.5, 0.0),
        Vec4::new(0.5, 0.5, 0.5, 0.0),
        Vec4::new(0.2, 0.2, 0.2, 0.0),
    );
    let pipeline = render(&vb, &ib, &[light], &[(0, 0)]);

    // Head-on: red saturates, green and blue come from the highlight alone
    assert_near(center_rgb(&pipeline), [255, 128, 128]);
}

#[test]
fn back_face_not_drawn() {
    let mut tri = front_triangle(2.0, Vec4::ONE);
    tri.swap(1, 2);
    let (vb, ib) = buffers(&[tri]);
    let pipeline = render(&vb, &ib, &[Light::default()], &[(0, 0)]);

    assert_eq!(pipeline.depth_at(CENTER, CENTER), Some(HUGE));
}

#[test]
fn nearest_hit_wins_in_any_draw_order() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    let (vb, ib) = buffers(&[front_triangle(4.0, red), front_triangle(2.0, blue)]);
    let lights = [Light::at(Vec3::new(0.0, 3.0, -1.0))];

    let forward = render(&vb, &ib, &lights, &[(0, 1)]);
    let reverse = render(&vb, &ib, &lights, &[(1, 1), (0, 0)]);

    let [r, _, b] = center_rgb(&forward);
    assert_eq!(r, 0);
    assert!(b > 0);
    assert!((forward.depth_at(CENTER, CENTER).unwrap() - 2.0).abs() < 1e-4);

    assert_eq!(forward.depth_buffer(), reverse.depth_buffer());
    assert_eq!(forward.color_buffer(), reverse.color_buffer());
}

#[test]
fn multiple_lights_accumulate() {
    let (vb, ib) = buffers(&[front_triangle(2.0, Vec4::ONE)]);
    let light = Light::at(Vec3::new(0.0, 3.0, -1.0));
    let pipeline = render(&vb, &ib, &[light, light], &[(0, 0)]);

    // Twice 0.5536 saturates
    assert_eq!(center_rgb(&pipeline), [255, 255, 255]);
}

/// Receiver smaller than one pixel, so only the center ray shades it, plus
/// two blockers between it and the light at (0, 8, 0).
mod shadows {
    use super::*;

    const LIGHT: Vec3 = Vec3::new(0.0, 8.0, 0.0);

    fn scene() -> (VertexBuffer, IndexBuffer) {
        let receiver = facing(
            [
                Vec3::new(-0.05, -0.05, 4.0),
                Vec3::new(0.0, 0.05, 4.0),
                Vec3::new(0.05, -0.05, 4.0),
            ],
            Vec4::ONE,
        );
        let near_blocker = facing(
            [
                Vec3::new(-1.0, 3.5, 2.0),
                Vec3::new(0.0, 5.0, 2.0),
                Vec3::new(1.0, 3.5, 2.0),
            ],
            Vec4::ONE,
        );
        let far_blocker = facing(
            [
                Vec3::new(-1.0, 1.5, 3.0),
                Vec3::new(0.0, 3.0, 3.0),
                Vec3::new(1.0, 1.5, 3.0),
            ],
            Vec4::ONE,
        );
        buffers(&[receiver, near_blocker, far_blocker])
    }

    fn cached(index: usize) -> Light {
        let mut light = Light::at(LIGHT);
        light.set_last_hit(index);
        light
    }

    #[test]
    fn unblocked_receiver_is_lit() {
        let (vb, _) = scene();
        let ib = IndexBuffer::new(&[0, 1, 2]).unwrap();
        let pipeline = render(&vb, &ib, &[Light::at(LIGHT)], &[(0, 0)]);

        // n . l = 4 / sqrt(80): (0.2 + 0.5 * 0.4472) * 256
        assert_near(center_rgb(&pipeline), [108, 108, 108]);
        assert_eq!(pipeline.lights()[0].last_hit(), None);
    }

    #[test]
    fn blocked_receiver_gets_ambient_only() {
        let (vb, ib) = scene();
        let pipeline = render(&vb, &ib, &[Light::at(LIGHT)], &[(0, 0)]);

        assert_eq!(center_rgb(&pipeline), [51, 51, 51]);
    }

    #[test]
    fn first_occluder_in_index_order_is_cached() {
        let (vb, ib) = scene();
        let pipeline = render(&vb, &ib, &[Light::at(LIGHT)], &[(0, 0)]);

        assert_eq!(pipeline.lights()[0].last_hit(), Some(1));
    }

    #[test]
    fn cached_occluder_kept_while_it_blocks() {
        let (vb, ib) = scene();
        let pipeline = render(&vb, &ib, &[cached(2)], &[(0, 0)]);

        assert_eq!(center_rgb(&pipeline), [51, 51, 51]);
        assert_eq!(pipeline.lights()[0].last_hit(), Some(2));
    }

    #[test]
    fn stale_cache_falls_back_to_scan() {
        let (vb, ib) = scene();

        // The receiver itself never occludes
        let pipeline = render(&vb, &ib, &[cached(0)], &[(0, 0)]);
        assert_eq!(pipeline.lights()[0].last_hit(), Some(1));
        assert_eq!(center_rgb(&pipeline), [51, 51, 51]);

        // Past the end of the index buffer
        let pipeline = render(&vb, &ib, &[cached(99)], &[(0, 0)]);
        assert_eq!(pipeline.lights()[0].last_hit(), Some(1));
    }

    #[test]
    fn cache_survives_frames_and_resets_on_new_buffers() {
        let (vb, ib) = scene();
        let mut pipeline = render(&vb, &ib, &[Light::at(LIGHT)], &[(0, 0)]);
        pipeline.end().unwrap();

        pipeline.begin().unwrap();
        pipeline.clear_buffer().unwrap();
        pipeline.draw_indexed_triangles(0, 0).unwrap();
        assert_eq!(center_rgb(&pipeline), [51, 51, 51]);
        assert_eq!(pipeline.lights()[0].last_hit(), Some(1));
        pipeline.end().unwrap();

        pipeline.set_index_buffer(&ib).unwrap();
        assert_eq!(pipeline.lights()[0].last_hit(), None);
    }
}

/// Demo scene through the configured camera, checked pixel by pixel against
/// an unculled reference cast.
mod demo {
    use super::*;

    const WIDTH: u32 = 40;
    const HEIGHT: u32 = 30;

    fn nearest_hit(tri: &Triangle, ib: &IndexBuffer, eye: Vec3, dir: Vec3) -> Vec<(usize, f32)> {
        let ray = Ray::new(eye, dir);
        (0..ib.triangle_count())
            .filter_map(|t| {
                let idx = ib.triangle(t).unwrap();
                let pd = tri.intersect_det(idx, &ray).unwrap();
                tri.intersect_barycentric(idx, &pd, &ray)
                    .unwrap()
                    .filter(|hit| hit.t > EPSILON)
                    .map(|hit| (t, hit.t))
            })
            .collect()
    }

    #[test]
    fn bounds_cover_every_hit_and_depth_is_minimum() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (vb, ib) = demo_scene().into_buffers().unwrap();
        let config = SceneConfig::default();
        let camera: Camera = config.camera();

        let mut pipeline = RenderPipeline::new(WIDTH, HEIGHT, ib.triangle_count()).unwrap();
        pipeline.set_camera(camera).unwrap();
        pipeline.set_vertex_buffer(&vb).unwrap();
        pipeline.set_index_buffer(&ib).unwrap();
        for light in config.lights() {
            pipeline.add_light(light).unwrap();
        }
        pipeline.begin().unwrap();
        pipeline.clear_buffer().unwrap();
        pipeline.draw_indexed_triangles(0, ib.triangle_count() - 1).unwrap();

        let tri = Triangle::new(&vb);
        let view = *pipeline.view();
        let mut covered = 0;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let hits = nearest_hit(&tri, &ib, camera.pos(), view.direction(x as i32, y as i32));
                for &(t, _) in &hits {
                    let bounds = pipeline.triangle_bounds(t).unwrap();
                    assert!(
                        bounds.contains(x as i32, y as i32),
                        "triangle {t} hit at ({x}, {y}) outside {bounds:?}"
                    );
                }

                let nearest = hits.iter().map(|&(_, d)| d).fold(HUGE, f32::min);
                assert_eq!(pipeline.depth_at(x, y), Some(nearest));
                if nearest < HUGE {
                    covered += 1;
                }
            }
        }

        // The camera looks down at the ground plane and the icosahedron
        assert!(covered > WIDTH * HEIGHT / 4);
    }

    #[test]
    fn moving_camera_changes_frame() {
        let (vb, ib) = demo_scene().into_buffers().unwrap();
        let config = SceneConfig::default();
        let mut camera = config.camera();

        let mut pipeline = RenderPipeline::new(WIDTH, HEIGHT, ib.triangle_count()).unwrap();
        pipeline.set_vertex_buffer(&vb).unwrap();
        pipeline.set_index_buffer(&ib).unwrap();
        pipeline.add_light(Light::default()).unwrap();

        let mut frames = Vec::new();
        for _ in 0..2 {
            pipeline.set_camera(camera).unwrap();
            pipeline.begin().unwrap();
            pipeline.clear_buffer().unwrap();
            pipeline.draw_indexed_triangles(0, ib.triangle_count() - 1).unwrap();
            frames.push(pipeline.color_buffer().to_vec());
            pipeline.end().unwrap();
            camera.rotate(0.3, 0.0);
        }

        assert_ne!(frames[0], frames[1]);
    }
}
