use burn::backend::{Autodiff, NdArray};
use tempfile::tempdir;
use translator_checkpoint::{model_config, CheckpointError, ResumePoint, Trainer};
use translator_core::{Seq2SeqItem, Tokenizer, TransformerConfig, WordLevelTokenizer};
use translator_utils::RunConfig;

type TrainBackend = Autodiff<NdArray>;

const SEQ_LEN: usize = 6;

struct Corpus {
    tokenizer_src: WordLevelTokenizer,
    tokenizer_tgt: WordLevelTokenizer,
    items: Vec<Seq2SeqItem>,
}

fn corpus() -> Corpus {
    let tokenizer_src = WordLevelTokenizer::from_words(["the", "cat", "dog", "sleeps", "runs"]).unwrap();
    let tokenizer_tgt = WordLevelTokenizer::from_words(["il", "gatto", "cane", "dorme", "corre"]).unwrap();
    let items = [
        ("the cat sleeps", "il gatto dorme"),
        ("the dog runs", "il cane corre"),
        ("the cat runs", "il gatto corre"),
    ]
    .into_iter()
    .map(|(src, tgt)| Seq2SeqItem::from_pair(src, tgt, &tokenizer_src, &tokenizer_tgt, SEQ_LEN).unwrap())
    .collect();
    Corpus {
        tokenizer_src,
        tokenizer_tgt,
        items,
    }
}

fn run_config(folder: &std::path::Path, num_epochs: usize, preload: Option<&str>) -> RunConfig {
    RunConfig {
        batch_size: 2,
        num_epochs,
        lr: 1e-3,
        seq_len: SEQ_LEN,
        d_model: 8,
        model_folder: folder.to_string_lossy().into_owned(),
        model_basename: "tmodel_".to_string(),
        preload: preload.map(str::to_string),
        ..RunConfig::default()
    }
}

fn tiny_model_config(run: &RunConfig, corpus: &Corpus) -> TransformerConfig {
    model_config(run, corpus.tokenizer_src.vocab_size(), corpus.tokenizer_tgt.vocab_size())
        .with_h(2)
        .with_n(1)
        .with_d_ff(16)
}

#[test]
fn test_model_config_from_run_config_tt() {
    let run = RunConfig::default();
    let config = model_config(&run, 120, 90);
    assert_eq!(config.src_vocab_size, 120);
    assert_eq!(config.tgt_vocab_size, 90);
    assert_eq!(config.src_seq_len, run.seq_len);
    assert_eq!(config.tgt_seq_len, run.seq_len);
    assert_eq!(config.d_model, run.d_model);
    assert!(config.validate().is_ok());
}

#[test]
fn test_two_epochs_then_resume_tt() {
    let device = Default::default();
    let dir = tempdir().unwrap();
    let corpus = corpus();

    // Две эпохи с нуля: по два батча (2 + 1 пример) на эпоху.
    let run = run_config(dir.path(), 2, None);
    let config = tiny_model_config(&run, &corpus);
    let trainer = Trainer::new(run);
    let (_, report) = trainer
        .train::<TrainBackend, _>(&config, &corpus.items, &corpus.items[..1], &corpus.tokenizer_tgt, &device)
        .unwrap();

    assert_eq!(report.resumed_from, ResumePoint::default());
    assert_eq!(report.epochs.len(), 2);
    assert_eq!(report.epochs[0].global_step, 2);
    assert_eq!(report.epochs[1].global_step, 4);
    for epoch in &report.epochs {
        let loss = epoch.mean_loss.unwrap();
        assert!(loss.is_finite() && loss > 0.0);
        assert_eq!(epoch.samples.len(), 1);
        assert_eq!(epoch.samples[0].source, "the cat sleeps");
    }
    let meta = trainer.store().load_meta("01").unwrap();
    assert_eq!(meta.global_step, 4);
    assert!(meta.has_optimizer);

    // Третья эпоха продолжает с последнего чекпоинта вместе с оптимизатором.
    let run = run_config(dir.path(), 3, Some("latest"));
    let (_, report) = Trainer::new(run)
        .train::<TrainBackend, _>(&config, &corpus.items, &[], &corpus.tokenizer_tgt, &device)
        .unwrap();
    assert_eq!(
        report.resumed_from,
        ResumePoint { initial_epoch: 2, global_step: 4 }
    );
    assert_eq!(report.epochs.len(), 1);
    assert_eq!(report.epochs[0].epoch, 2);
    assert_eq!(report.epochs[0].global_step, 6);
    assert!(report.epochs[0].samples.is_empty());
    assert!(dir.path().join("tmodel_02_optim.mpk").is_file());

    // Все эпохи уже пройдены: обучать нечего.
    let run = run_config(dir.path(), 3, Some("latest"));
    let (_, report) = Trainer::new(run)
        .train::<TrainBackend, _>(&config, &corpus.items, &[], &corpus.tokenizer_tgt, &device)
        .unwrap();
    assert_eq!(report.resumed_from.initial_epoch, 3);
    assert!(report.epochs.is_empty());
}

#[test]
fn test_zero_batch_size_rejected_tt() {
    let device = Default::default();
    let dir = tempdir().unwrap();
    let corpus = corpus();
    let run = RunConfig {
        batch_size: 0,
        ..run_config(dir.path(), 1, None)
    };
    let config = tiny_model_config(&run, &corpus);

    match Trainer::new(run).train::<TrainBackend, _>(&config, &corpus.items, &[], &corpus.tokenizer_tgt, &device) {
        Err(CheckpointError::InvalidRunConfig(msg)) => assert!(msg.contains("batch_size")),
        other => panic!("Expected InvalidRunConfig, got {:?}", other.map(|(_, report)| report)),
    }
    assert!(!dir.path().join("tmodel_00.json").exists());
}
