use std::collections::HashMap;

use burn::backend::NdArray;
use tempfile::tempdir;
use translator_core::{
    Seq2SeqBatch, Seq2SeqItem, SpecialTokens, Tokenizer, TranslatorCoreError, WordLevelTokenizer,
};

type TestBackend = NdArray;

fn tokenizers() -> (WordLevelTokenizer, WordLevelTokenizer) {
    (
        WordLevelTokenizer::from_words(["a", "b", "c"]).unwrap(),
        WordLevelTokenizer::from_words(["x", "y", "z"]).unwrap(),
    )
}

#[test]
fn test_special_tokens_come_first_tt() {
    let (src, _) = tokenizers();
    assert_eq!(
        src.special_tokens(),
        SpecialTokens { unk: 0, pad: 1, sos: 2, eos: 3 }
    );
    assert_eq!(SpecialTokens::resolve(&src).unwrap(), src.special_tokens());
    assert_eq!(src.vocab_size(), 7);
}

#[test]
fn test_encode_decode_tt() {
    let tokenizer = WordLevelTokenizer::from_words(["hello", "world", "!"]).unwrap();
    assert_eq!(tokenizer.encode("hello world!"), vec![4, 5, 6]);
    // Неизвестное слово -> [UNK].
    assert_eq!(tokenizer.encode("hello there"), vec![4, 0]);
    assert_eq!(tokenizer.encode("   "), Vec::<i64>::new());
    // Специальные токены пропускаются при декодировании.
    assert_eq!(tokenizer.decode(&[2, 4, 0, 5, 3, 1, 1]), "hello world");
}

#[test]
fn test_missing_special_token_tt() {
    let vocab: HashMap<String, i64> = [("[UNK]", 0), ("[PAD]", 1), ("[SOS]", 2), ("word", 3)]
        .into_iter()
        .map(|(token, id)| (token.to_string(), id))
        .collect();
    match WordLevelTokenizer::from_vocab(vocab) {
        Err(TranslatorCoreError::MissingSpecialToken(token)) => assert_eq!(token, "[EOS]"),
        other => panic!("Expected MissingSpecialToken, got {other:?}"),
    }
}

#[test]
fn test_json_round_trip_tt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tokenizer_it.json");
    let tokenizer = WordLevelTokenizer::from_words(["ciao", "mondo"]).unwrap();
    tokenizer.save_json(&path).unwrap();

    let loaded = WordLevelTokenizer::from_json_file(&path).unwrap();
    assert_eq!(loaded.vocab_size(), tokenizer.vocab_size());
    assert_eq!(loaded.encode("ciao mondo"), tokenizer.encode("ciao mondo"));
    assert_eq!(loaded.special_tokens(), tokenizer.special_tokens());
}

#[test]
fn test_json_wrong_model_type_tt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tokenizer_bpe.json");
    std::fs::write(
        &path,
        r#"{"model": {"type": "BPE", "vocab": {"[UNK]": 0, "[PAD]": 1, "[SOS]": 2, "[EOS]": 3}}}"#,
    )
    .unwrap();
    assert!(matches!(
        WordLevelTokenizer::from_json_file(&path),
        Err(TranslatorCoreError::InvalidConfig(_))
    ));
}

#[test]
fn test_item_framing_tt() {
    let (src, tgt) = tokenizers();
    let item = Seq2SeqItem::from_pair("a b", "z", &src, &tgt, 6).unwrap();
    assert_eq!(item.encoder_input, vec![2, 4, 5, 3, 1, 1]);
    assert_eq!(item.decoder_input, vec![2, 6, 1, 1, 1, 1]);
    assert_eq!(item.label, vec![6, 3, 1, 1, 1, 1]);
    assert_eq!(item.src_text, "a b");
    assert_eq!(item.tgt_text, "z");
    assert_eq!(item.seq_len(), 6);
}

#[test]
fn test_item_exact_fit_and_too_long_tt() {
    let (src, tgt) = tokenizers();
    // 2 слова + [SOS] + [EOS] = 4 и 3 слова + [SOS] = 4.
    let item = Seq2SeqItem::from_pair("a b", "x y z", &src, &tgt, 4).unwrap();
    assert_eq!(item.encoder_input, vec![2, 4, 5, 3]);
    assert_eq!(item.label, vec![4, 5, 6, 3]);

    assert!(matches!(
        Seq2SeqItem::from_pair("a b c", "x", &src, &tgt, 4),
        Err(TranslatorCoreError::SentenceTooLong { len: 5, seq_len: 4 })
    ));
    assert!(matches!(
        Seq2SeqItem::from_pair("a", "x y z x", &src, &tgt, 4),
        Err(TranslatorCoreError::SentenceTooLong { len: 5, seq_len: 4 })
    ));
}

#[test]
fn test_batch_from_items_tt() {
    let device = Default::default();
    let (src, tgt) = tokenizers();
    let items = vec![
        Seq2SeqItem::from_pair("a b", "x y", &src, &tgt, 5).unwrap(),
        Seq2SeqItem::from_pair("c", "z", &src, &tgt, 5).unwrap(),
    ];
    let batch = Seq2SeqBatch::<TestBackend>::from_items(&items, &device).unwrap();

    assert_eq!(batch.batch_size(), 2);
    assert_eq!(batch.encoder_input.dims(), [2, 5]);
    assert_eq!(batch.decoder_input.dims(), [2, 5]);
    assert_eq!(batch.label.dims(), [2, 5]);
    assert_eq!(batch.encoder_mask.dims(), [2, 1, 1, 5]);
    assert_eq!(batch.decoder_mask.dims(), [2, 1, 5, 5]);
    assert_eq!(batch.src_text, vec!["a b".to_string(), "c".to_string()]);

    assert_eq!(
        batch.encoder_input.clone().into_data().to_vec::<i64>().unwrap(),
        vec![2, 4, 5, 3, 1, 2, 6, 3, 1, 1]
    );
    assert_eq!(
        batch.encoder_mask.into_data().to_vec::<bool>().unwrap(),
        vec![true, true, true, true, false, true, true, true, false, false]
    );
    // Третья строка второго элемента: [SOS] z [PAD]... -> видны только позиции 0 и 1.
    let decoder_mask = batch.decoder_mask.into_data().to_vec::<bool>().unwrap();
    assert_eq!(&decoder_mask[25 + 10..25 + 15], &[true, true, false, false, false]);
}

#[test]
fn test_batch_rejects_empty_and_ragged_tt() {
    let device = Default::default();
    assert!(matches!(
        Seq2SeqBatch::<TestBackend>::from_items(&[], &device),
        Err(TranslatorCoreError::IncompatibleShape(_))
    ));

    let (src, tgt) = tokenizers();
    let items = vec![
        Seq2SeqItem::from_pair("a", "x", &src, &tgt, 4).unwrap(),
        Seq2SeqItem::from_pair("a", "x", &src, &tgt, 5).unwrap(),
    ];
    assert!(matches!(
        Seq2SeqBatch::<TestBackend>::from_items(&items, &device),
        Err(TranslatorCoreError::IncompatibleShape(_))
    ));
}
