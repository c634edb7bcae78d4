use burn::backend::NdArray;
use burn::tensor::{Bool, Int, Tensor, TensorData};
use translator_core::{causal_mask, decoder_mask, padding_mask};

type TestBackend = NdArray;

fn ids(values: Vec<i64>, shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
    Tensor::from_data(TensorData::new(values, shape), &Default::default())
}

fn values(mask: Tensor<TestBackend, 4, Bool>) -> Vec<bool> {
    mask.into_data().to_vec::<bool>().unwrap()
}

#[test]
fn test_padding_mask_mt() {
    let mask = padding_mask(ids(vec![3, 5, 1, 0, 2, 0, 0, 0], [2, 4]), 0);
    assert_eq!(mask.dims(), [2, 1, 1, 4]);
    assert_eq!(
        values(mask),
        vec![true, true, true, false, true, false, false, false]
    );
}

#[test]
fn test_causal_mask_mt() {
    let mask = causal_mask::<TestBackend>(3, &Default::default());
    assert_eq!(mask.dims(), [1, 1, 3, 3]);
    assert_eq!(
        values(mask),
        vec![true, false, false, true, true, false, true, true, true]
    );
}

#[test]
fn test_decoder_mask_combines_padding_and_causality_mt() {
    let mask = decoder_mask(ids(vec![2, 7, 1, 1], [1, 4]), 1);
    assert_eq!(mask.dims(), [1, 1, 4, 4]);
    #[rustfmt::skip]
    let expected = vec![
        true,  false, false, false,
        true,  true,  false, false,
        true,  true,  false, false,
        true,  true,  false, false,
    ];
    assert_eq!(values(mask), expected);
}

#[test]
fn test_decoder_mask_batch_mt() {
    let mask = decoder_mask(ids(vec![2, 5, 2, 0], [2, 2]), 0);
    assert_eq!(mask.dims(), [2, 1, 2, 2]);
    assert_eq!(
        values(mask),
        vec![true, false, true, true, true, false, true, false]
    );
}
