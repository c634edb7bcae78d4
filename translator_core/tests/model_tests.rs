use approx::assert_abs_diff_eq;
use burn::backend::NdArray;
use burn::module::Module;
use burn::tensor::{Int, Tensor, TensorData};
use translator_core::{
    causal_mask, padding_mask, Mode, Seq2SeqBatch, Seq2SeqItem, TransformerConfig,
    Tokenizer, TranslatorCoreError, WordLevelTokenizer,
};

type TestBackend = NdArray;

fn tiny_config() -> TransformerConfig {
    TransformerConfig::new(10, 10, 4, 4)
        .with_d_model(8)
        .with_h(2)
        .with_n(1)
        .with_d_ff(16)
}

fn ids(values: Vec<i64>, shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
    Tensor::from_data(TensorData::new(values, shape), &Default::default())
}

fn to_vec(tensor: Tensor<TestBackend, 3>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap()
}

#[test]
fn test_encode_decode_project_shapes_mt() {
    let device = Default::default();
    let model = tiny_config().init::<TestBackend>(&device).unwrap();
    let src = ids(vec![3, 5, 1, 0], [1, 4]);
    let src_mask = padding_mask(src.clone(), 0);

    let memory = model.encode(src, Some(src_mask.clone()), Mode::Eval).unwrap();
    assert_eq!(memory.dims(), [1, 4, 8]);

    let hidden = model
        .decode(memory, Some(src_mask), ids(vec![2], [1, 1]), Some(causal_mask(1, &device)), Mode::Eval)
        .unwrap();
    assert_eq!(hidden.dims(), [1, 1, 8]);
    assert_eq!(model.project(hidden).dims(), [1, 1, 10]);
}

#[test]
fn test_shapes_preserved_for_any_depth_mt() {
    let device = Default::default();
    for n in [0, 1, 3] {
        let model = tiny_config().with_n(n).init::<TestBackend>(&device).unwrap();
        let src = ids(vec![3, 5, 1, 0, 4, 4, 4, 4], [2, 4]);
        let memory = model.encode(src, None, Mode::Train).unwrap();
        assert_eq!(memory.dims(), [2, 4, 8], "n = {n}");

        let tgt = ids(vec![2, 6, 7, 2, 6, 0], [2, 3]);
        let hidden = model
            .decode(memory, None, tgt, Some(causal_mask(3, &device)), Mode::Train)
            .unwrap();
        assert_eq!(hidden.dims(), [2, 3, 8], "n = {n}");
    }
}

#[test]
fn test_eval_mode_is_deterministic_mt() {
    let device = Default::default();
    let model = tiny_config().with_dropout(0.5).init::<TestBackend>(&device).unwrap();
    let src = ids(vec![3, 5, 1, 0], [1, 4]);
    let first = model.encode(src.clone(), None, Mode::Eval).unwrap();
    let second = model.encode(src, None, Mode::Eval).unwrap();
    assert_eq!(to_vec(first), to_vec(second));
}

#[test]
fn test_all_attend_mask_equals_no_mask_mt() {
    let device = Default::default();
    let model = tiny_config().init::<TestBackend>(&device).unwrap();
    // Без паддинга маска разрешает все позиции.
    let src = ids(vec![3, 5, 1, 4], [1, 4]);
    let mask = padding_mask(src.clone(), 0);

    let masked = model.encode(src.clone(), Some(mask), Mode::Eval).unwrap();
    let unmasked = model.encode(src, None, Mode::Eval).unwrap();
    assert_eq!(to_vec(masked), to_vec(unmasked));
}

#[test]
fn test_padded_positions_do_not_leak_mt() {
    let device = Default::default();
    let model = tiny_config().init::<TestBackend>(&device).unwrap();
    let src = ids(vec![3, 5, 1, 0], [1, 4]);
    let mask = padding_mask(src.clone(), 0);
    let reference = to_vec(model.encode(src, Some(mask.clone()), Mode::Eval).unwrap());

    // Меняем содержимое паддинговой позиции, маску оставляем прежней.
    let altered = ids(vec![3, 5, 1, 7], [1, 4]);
    let changed = to_vec(model.encode(altered, Some(mask), Mode::Eval).unwrap());

    for idx in 0..3 * 8 {
        assert_abs_diff_eq!(reference[idx], changed[idx], epsilon = 1e-5);
    }
}

#[test]
fn test_invalid_inputs_rejected_mt() {
    let device = Default::default();
    let model = tiny_config().init::<TestBackend>(&device).unwrap();

    assert!(matches!(
        model.encode(ids(vec![3, 10, 0, 0], [1, 4]), None, Mode::Eval),
        Err(TranslatorCoreError::TokenOutOfRange { id: 10, vocab_size: 10 })
    ));
    assert!(matches!(
        model.encode(ids(vec![3, 4, 5, 6, 7], [1, 5]), None, Mode::Eval),
        Err(TranslatorCoreError::SequenceTooLong { len: 5, max_len: 4 })
    ));
}

#[test]
fn test_parameter_count_excludes_positional_table_mt() {
    let device = Default::default();
    let model = tiny_config().init::<TestBackend>(&device).unwrap();
    // Эмбеддинги 2 * 10 * 8 = 160; блок кодировщика: внимание 4 * (64 + 8) = 288,
    // feed-forward 8 * 16 + 16 + 16 * 8 + 8 = 280, две нормализации по 2 скаляра;
    // блок декодера: два внимания, feed-forward, три нормализации; финальные
    // нормализации по 2; проекция 8 * 10 + 10 = 90.
    let expected = 160 + (288 + 280 + 4 + 2) + (2 * 288 + 280 + 6 + 2) + 90;
    assert_eq!(model.num_params(), expected);

    let info = model.info();
    assert_eq!(info.num_params, expected);
    assert_eq!(info.d_model, 8);
    assert_eq!(info.num_heads, 2);
    assert_eq!(info.num_layers, 1);
    assert_eq!(model.config(), &tiny_config());
}

#[test]
fn test_forward_on_batch_mt() {
    let device = Default::default();
    let tokenizer_src = WordLevelTokenizer::from_words(["the", "cat", "sleeps"]).unwrap();
    let tokenizer_tgt = WordLevelTokenizer::from_words(["il", "gatto", "dorme"]).unwrap();
    let config = TransformerConfig::new(tokenizer_src.vocab_size(), tokenizer_tgt.vocab_size(), 6, 6)
    .with_d_model(8)
    .with_h(2)
    .with_n(2)
    .with_d_ff(16);
    let model = config.init::<TestBackend>(&device).unwrap();

    let items = vec![
        Seq2SeqItem::from_pair("the cat sleeps", "il gatto dorme", &tokenizer_src, &tokenizer_tgt, 6).unwrap(),
        Seq2SeqItem::from_pair("the cat", "il gatto", &tokenizer_src, &tokenizer_tgt, 6).unwrap(),
    ];
    let batch = Seq2SeqBatch::<TestBackend>::from_items(&items, &device).unwrap();
    let logits = model.forward(&batch, Mode::Train).unwrap();
    assert_eq!(logits.dims(), [2, 6, 7]);
}
