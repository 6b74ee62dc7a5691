use atelier_master::polish::{self, DEFAULT_LIGHTING_DEGREES, POLISH_LAYER_NAME};
use atelier_master::{
    export, Annotation, AtelierError, LayerKind, LayerStack, PolishRequest, PolishService,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{Rgba, RgbaImage};

// A tiny valid polish payload: a 2x2 red PNG wrapped as a data string.
fn red_data_url() -> String {
    let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    let png = atelier_master::io::encode_png(&red).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

struct Declining;

impl PolishService for Declining {
    fn polish(&self, _request: &PolishRequest) -> atelier_master::Result<Option<String>> {
        Ok(None)
    }
}

struct Refining(String);

impl PolishService for Refining {
    fn polish(&self, _request: &PolishRequest) -> atelier_master::Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

struct Failing;

impl PolishService for Failing {
    fn polish(&self, _request: &PolishRequest) -> atelier_master::Result<Option<String>> {
        Err(AtelierError::Remote("network unreachable".into()))
    }
}

#[test]
fn test_thumbnail_data_string_round_trips() {
    let mut stack = LayerStack::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let base = stack.active();
    stack
        .surface_mut(base)
        .unwrap()
        .write_pixel(10, 10, [128, 0, 32, 255])
        .unwrap();

    let data = export::to_thumbnail(&stack).unwrap();
    assert!(data.starts_with("data:image/png;base64,"));

    let bytes = STANDARD.decode(polish::strip_data_url(&data)).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!((decoded.width(), decoded.height()), (500, 700));
    assert_eq!(decoded.get_pixel(10, 10).0, [128, 0, 32, 255]);
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
}

#[test]
fn test_download_flattens_onto_white_and_names_after_the_title() {
    let stack = LayerStack::new(4, 4);
    let (name, bytes) = export::to_download(&stack, "Gala").unwrap();
    assert_eq!(name, "manuscript-Gala.png");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(3, 3).0, [255, 255, 255, 255]);
}

#[test]
fn test_download_title_falls_back_to_export() {
    let stack = LayerStack::new(4, 4);
    let (name, _) = export::to_download(&stack, "").unwrap();
    assert_eq!(name, "manuscript-export.png");

    let (name, _) = export::to_download(&stack, "   ").unwrap();
    assert_eq!(name, "manuscript-export.png");
}

#[test]
fn test_prompt_embeds_annotations_and_lighting() {
    let annotations = vec![
        Annotation::new(1, "Bodice", "apply raw silk texture", vec![]),
        Annotation::new(2, "Hem", "feathered organza", vec![]),
    ];

    let prompt = polish::build_prompt(&annotations, DEFAULT_LIGHTING_DEGREES);
    assert!(prompt.contains("You are a professional fashion illustrator."));
    assert!(prompt.contains("- Bodice: apply raw silk texture"));
    assert!(prompt.contains("- Hem: feathered organza"));
    assert!(prompt.contains("45 degree light source"));
}

#[test]
fn test_strip_data_url_takes_the_payload_after_the_comma() {
    assert_eq!(polish::strip_data_url("data:image/png;base64,abcd"), "abcd");
    assert_eq!(polish::strip_data_url("abcd"), "abcd");
}

#[test]
fn test_declined_polish_leaves_the_stack_untouched() {
    let mut stack = LayerStack::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let result = polish::run_polish(&Declining, &mut stack, &[], DEFAULT_LIGHTING_DEGREES).unwrap();

    assert!(result.is_none());
    assert_eq!(stack.layer_count(), 1);
}

#[test]
fn test_successful_polish_lands_as_the_active_top_layer() {
    let mut stack = LayerStack::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let service = Refining(red_data_url());

    let id = polish::run_polish(&service, &mut stack, &[], DEFAULT_LIGHTING_DEGREES)
        .unwrap()
        .unwrap();

    assert_eq!(stack.layer_count(), 2);
    assert_eq!(stack.active(), id);

    let top = stack.layers().last().unwrap();
    assert_eq!(top.id, id);
    assert_eq!(top.name, POLISH_LAYER_NAME);
    assert_eq!(top.kind, LayerKind::AiPolish);

    // The 2x2 source fits 500x700 as a centered 500x500 block.
    let surface = stack.surface(id).unwrap();
    assert_eq!(surface.read_pixel(250, 350).unwrap(), [255, 0, 0, 255]);
    assert_eq!(surface.read_pixel(250, 50).unwrap()[3], 0);
}

#[test]
fn test_remote_failure_propagates_and_preserves_the_stack() {
    let mut stack = LayerStack::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let err = polish::run_polish(&Failing, &mut stack, &[], DEFAULT_LIGHTING_DEGREES).unwrap_err();

    assert!(matches!(err, AtelierError::Remote(_)));
    assert_eq!(stack.layer_count(), 1);
}

#[test]
fn test_undecodable_payloads_are_remote_errors() {
    let err = polish::decode_polish_result("data:image/png;base64,@@@").unwrap_err();
    assert!(matches!(err, AtelierError::Remote(_)));

    // Valid base64 that is not an image fails at the codec instead.
    let not_png = format!("data:image/png;base64,{}", STANDARD.encode(b"not a png"));
    let err = polish::decode_polish_result(&not_png).unwrap_err();
    assert!(matches!(err, AtelierError::ResourceLoad(_)));
}
