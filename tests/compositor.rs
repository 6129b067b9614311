//! Compositor/player scenarios built directly against the typed
//! [`apngine::model::Animation`] so they don't depend on a real PNG decode.

use apngine::compositor::canvas::{Canvas, RgbaCanvas};
use apngine::compositor::mode::PlaybackMode;
use apngine::compositor::player::{Player, PlayerOptionsBuilder};
use apngine::compositor::retime::scale_delays;
use apngine::compositor::spritesheet::{compute_layout, generate};
use apngine::decoder::Raster;
use apngine::model::{Animation, BlendMode, Dispose, FrameInfo, RawFrame, Region};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Raster {
    let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
    for _ in 0..(w * h) {
        pixels.extend_from_slice(&rgba);
    }
    Raster::new(w, h, pixels)
}

fn three_frame_animation() -> Animation<Raster> {
    let colors = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    let frames = colors
        .iter()
        .map(|&c| RawFrame { png_bytes: vec![], raster: solid(4, 4, c) })
        .collect();
    let frame_info = (0..3)
        .map(|_| FrameInfo {
            region: Region { x: 0, y: 0, width: 4, height: 4 },
            delay_ms: 10.0,
            dispose: Dispose::None,
            blend: BlendMode::Source,
        })
        .collect();
    Animation {
        width: 4,
        height: 4,
        iterations: 0,
        duration_ms: 30.0,
        is_apng: true,
        frames,
        frame_info,
        warnings: vec![],
    }
}

#[test]
fn pingpong_sequence_visits_boundary_frames_twice() {
    let animation = three_frame_animation();
    let canvas = RgbaCanvas::new(4, 4);
    let mut player = Player::new(
        animation,
        canvas,
        PlayerOptionsBuilder::new().mode(PlaybackMode::PingPong).build(),
    );

    assert_eq!(player.sequence_len(), 6);

    let mut visited_colors = Vec::new();
    for i in 0..6 {
        player.seek_to_index(i);
        visited_colors.push(player.canvas().pixels()[0..4].to_vec());
    }

    assert_eq!(visited_colors[0], vec![255, 0, 0, 255]);
    assert_eq!(visited_colors[1], vec![0, 255, 0, 255]);
    assert_eq!(visited_colors[2], vec![0, 0, 255, 255]);
    assert_eq!(visited_colors[3], vec![0, 0, 255, 255]);
    assert_eq!(visited_colors[4], vec![0, 255, 0, 255]);
    assert_eq!(visited_colors[5], vec![255, 0, 0, 255]);
}

#[test]
fn retime_by_scale_two_doubles_delays_and_duration() {
    let mut animation = three_frame_animation();
    animation.frame_info[0].delay_ms = 10.0;
    animation.frame_info[1].delay_ms = 20.0;
    animation.frame_info[2].delay_ms = 30.0;
    animation.recompute_duration();
    assert_eq!(animation.duration_ms, 60.0);

    scale_delays(&mut animation, 2.0);

    let delays: Vec<f64> = animation.frame_info.iter().map(|f| f.delay_ms).collect();
    assert_eq!(delays, vec![20.0, 40.0, 60.0]);
    assert_eq!(animation.duration_ms, 120.0);
}

#[test]
fn sprite_sheet_single_frame_equals_canvas_dimensions() {
    let layout = compute_layout(4, 4, 1, 6000);
    assert_eq!(layout.width, 4);
    assert_eq!(layout.height, 4);
}

#[test]
fn sprite_sheet_generates_all_frames_in_a_single_row() {
    let animation = three_frame_animation();
    let canvas = RgbaCanvas::new(4, 4);
    let mut player = Player::new(animation, canvas, Default::default());

    let sheet = generate(&mut player, 4, 4, 6000);

    assert_eq!(sheet.width(), 12);
    assert_eq!(sheet.height(), 4);
    assert_eq!(&sheet.pixels()[0..4], &[255, 0, 0, 255]);
    assert_eq!(&sheet.pixels()[16..20], &[0, 255, 0, 255]);
    assert_eq!(&sheet.pixels()[32..36], &[0, 0, 255, 255]);
}

#[test]
fn seek_to_time_finds_first_cumulative_delay_at_or_past_target() {
    let animation = three_frame_animation(); // delays [10, 10, 10]
    let canvas = RgbaCanvas::new(4, 4);
    let mut player = Player::new(animation, canvas, Default::default());

    player.seek_to_time(15.0); // cumulative after frame 1 is 20 >= 15
    assert_eq!(player.cursor(), 1);
}
